//! Domain layer: the node store and its invariants
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod error;
pub mod kind;
pub mod payload;
mod reclaim;

pub use arena::{Ast, Node, NodeId, PostOrder, PreOrder, Visit};
pub use error::{DomainError, DomainResult, TreeViolation};
pub use kind::{KindCategory, NodeKind, UnknownKind};
pub use payload::Payload;
