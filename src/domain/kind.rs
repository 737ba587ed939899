//! Closed set of node categories

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::payload::Payload;

/// Role of a tree node.
///
/// The set is closed: a new language construct means a new variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    // statements
    Block,
    If,
    Input,
    Output,
    Return,
    While,
    Write,

    // arithmetic
    Plus,
    Minus,
    Times,
    Over,

    // relational
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Neq,

    Assign,

    // literals
    Num,
    #[serde(rename = "STRING")]
    Str,

    // variables
    VarList,
    VarDecl,
    VarUse,

    // functions
    FuncList,
    FuncDecl,
    FuncName,
    FuncHeader,
    FuncBody,
    ParamList,

    // calls
    FuncCall,
    ArgList,
}

/// Coarse grouping of node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KindCategory {
    Statement,
    Arithmetic,
    Relational,
    Assignment,
    Literal,
    Variable,
    Function,
    Call,
}

impl fmt::Display for KindCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            KindCategory::Statement => "statement",
            KindCategory::Arithmetic => "arithmetic",
            KindCategory::Relational => "relational",
            KindCategory::Assignment => "assignment",
            KindCategory::Literal => "literal",
            KindCategory::Variable => "variable",
            KindCategory::Function => "function",
            KindCategory::Call => "call",
        };
        f.write_str(s)
    }
}

impl NodeKind {
    /// Every kind, in declaration order.
    pub const ALL: [NodeKind; 31] = [
        NodeKind::Block,
        NodeKind::If,
        NodeKind::Input,
        NodeKind::Output,
        NodeKind::Return,
        NodeKind::While,
        NodeKind::Write,
        NodeKind::Plus,
        NodeKind::Minus,
        NodeKind::Times,
        NodeKind::Over,
        NodeKind::Lt,
        NodeKind::Le,
        NodeKind::Gt,
        NodeKind::Ge,
        NodeKind::Eq,
        NodeKind::Neq,
        NodeKind::Assign,
        NodeKind::Num,
        NodeKind::Str,
        NodeKind::VarList,
        NodeKind::VarDecl,
        NodeKind::VarUse,
        NodeKind::FuncList,
        NodeKind::FuncDecl,
        NodeKind::FuncName,
        NodeKind::FuncHeader,
        NodeKind::FuncBody,
        NodeKind::ParamList,
        NodeKind::FuncCall,
        NodeKind::ArgList,
    ];

    /// Canonical human-readable name, e.g. `PLUS` or `VAR_DECL`.
    pub const fn name(self) -> &'static str {
        match self {
            NodeKind::Block => "BLOCK",
            NodeKind::If => "IF",
            NodeKind::Input => "INPUT",
            NodeKind::Output => "OUTPUT",
            NodeKind::Return => "RETURN",
            NodeKind::While => "WHILE",
            NodeKind::Write => "WRITE",
            NodeKind::Plus => "PLUS",
            NodeKind::Minus => "MINUS",
            NodeKind::Times => "TIMES",
            NodeKind::Over => "OVER",
            NodeKind::Lt => "LT",
            NodeKind::Le => "LE",
            NodeKind::Gt => "GT",
            NodeKind::Ge => "GE",
            NodeKind::Eq => "EQ",
            NodeKind::Neq => "NEQ",
            NodeKind::Assign => "ASSIGN",
            NodeKind::Num => "NUM",
            NodeKind::Str => "STRING",
            NodeKind::VarList => "VAR_LIST",
            NodeKind::VarDecl => "VAR_DECL",
            NodeKind::VarUse => "VAR_USE",
            NodeKind::FuncList => "FUNC_LIST",
            NodeKind::FuncDecl => "FUNC_DECL",
            NodeKind::FuncName => "FUNC_NAME",
            NodeKind::FuncHeader => "FUNC_HEADER",
            NodeKind::FuncBody => "FUNC_BODY",
            NodeKind::ParamList => "PARAM_LIST",
            NodeKind::FuncCall => "FUNC_CALL",
            NodeKind::ArgList => "ARG_LIST",
        }
    }

    pub const fn category(self) -> KindCategory {
        match self {
            NodeKind::Block
            | NodeKind::If
            | NodeKind::Input
            | NodeKind::Output
            | NodeKind::Return
            | NodeKind::While
            | NodeKind::Write => KindCategory::Statement,
            NodeKind::Plus | NodeKind::Minus | NodeKind::Times | NodeKind::Over => {
                KindCategory::Arithmetic
            }
            NodeKind::Lt
            | NodeKind::Le
            | NodeKind::Gt
            | NodeKind::Ge
            | NodeKind::Eq
            | NodeKind::Neq => KindCategory::Relational,
            NodeKind::Assign => KindCategory::Assignment,
            NodeKind::Num | NodeKind::Str => KindCategory::Literal,
            NodeKind::VarList | NodeKind::VarDecl | NodeKind::VarUse => KindCategory::Variable,
            NodeKind::FuncList
            | NodeKind::FuncDecl
            | NodeKind::FuncName
            | NodeKind::FuncHeader
            | NodeKind::FuncBody
            | NodeKind::ParamList => KindCategory::Function,
            NodeKind::FuncCall | NodeKind::ArgList => KindCategory::Call,
        }
    }

    /// True for kinds whose nodes carry a value instead of `Payload::None`.
    pub const fn is_value_bearing(self) -> bool {
        matches!(
            self,
            NodeKind::Num
                | NodeKind::Str
                | NodeKind::VarDecl
                | NodeKind::VarUse
                | NodeKind::FuncName
        )
    }

    /// Whether `payload` has the shape this kind needs.
    ///
    /// - `NUM`: `Int`
    /// - `STRING`: `Text` or `Symbol` (string table index)
    /// - `VAR_DECL`, `VAR_USE`, `FUNC_NAME`: `Symbol`
    /// - everything else: `None`
    pub fn accepts(self, payload: &Payload) -> bool {
        match self {
            NodeKind::Num => matches!(payload, Payload::Int(_)),
            NodeKind::Str => matches!(payload, Payload::Text(_) | Payload::Symbol(_)),
            NodeKind::VarDecl | NodeKind::VarUse | NodeKind::FuncName => {
                matches!(payload, Payload::Symbol(_))
            }
            _ => matches!(payload, Payload::None),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Name did not match any kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown node kind: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for NodeKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}
