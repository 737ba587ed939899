//! Kind-dependent node payload

use std::fmt;

/// Value carried by a node. Which variant is legal depends on the node's
/// kind, see [`NodeKind::accepts`](crate::domain::NodeKind::accepts).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Payload {
    /// Structural node, nothing attached.
    #[default]
    None,
    /// Literal integer value.
    Int(i64),
    /// Index into a symbol or string table owned by a later stage.
    Symbol(usize),
    /// Inline string literal.
    Text(String),
}

impl Payload {
    /// Integer view of the payload: `0` for structural nodes, the value or
    /// table index otherwise. Inline text has no integer form.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Payload::None => Some(0),
            Payload::Int(n) => Some(*n),
            Payload::Symbol(idx) => i64::try_from(*idx).ok(),
            Payload::Text(_) => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Payload::None)
    }

    /// Short variant name used in diagnostics.
    pub fn shape(&self) -> &'static str {
        match self {
            Payload::None => "none",
            Payload::Int(_) => "int",
            Payload::Symbol(_) => "symbol",
            Payload::Text(_) => "text",
        }
    }
}

/// Renders the value as it appears next to a kind name: `2`, `#3`, `"hi"`.
/// `None` renders as the empty string.
impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::None => Ok(()),
            Payload::Int(n) => write!(f, "{}", n),
            Payload::Symbol(idx) => write!(f, "#{}", idx),
            Payload::Text(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<i64> for Payload {
    fn from(n: i64) -> Self {
        Payload::Int(n)
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Payload::Text(s)
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Payload::Text(s.to_string())
    }
}
