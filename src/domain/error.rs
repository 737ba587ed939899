//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::arena::NodeId;
use crate::domain::kind::NodeKind;

/// Ownership rule a caller tried to break.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeViolation {
    #[error("handle does not refer to a live node")]
    Stale,

    #[error("node is already owned by another parent")]
    AlreadyOwned,

    #[error("attaching would create a cycle")]
    Cycle,

    #[error("node is owned by a parent and cannot be freed on its own")]
    NotRoot,
}

/// Domain errors represent misuse of the node store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("child index {index} out of range (child count {count})")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("{kind} does not take a {payload} payload")]
    PayloadMismatch { kind: NodeKind, payload: &'static str },

    #[error("invalid tree state at {node}: {violation}")]
    InvalidTreeState {
        node: NodeId,
        violation: TreeViolation,
    },
}

impl DomainError {
    pub(crate) fn invalid(node: NodeId, violation: TreeViolation) -> Self {
        Self::InvalidTreeState { node, violation }
    }

    /// The ownership violation, if this is an `InvalidTreeState`.
    pub fn violation(&self) -> Option<TreeViolation> {
        match self {
            Self::InvalidTreeState { violation, .. } => Some(*violation),
            _ => None,
        }
    }
}

/// Result type for node store operations.
pub type DomainResult<T> = Result<T, DomainError>;
