//! Application layer: rendering, tree documents, and summaries
//!
//! This layer orchestrates domain logic and owns all text and file I/O.

pub mod document;
pub mod error;
pub mod error_ext;
pub mod printer;
pub mod stats;

pub use document::{NodeSpec, TreeDocument};
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use printer::{
    render_dot, render_text, to_term_tree, write_dot, write_text, GraphStyle, TextStyle,
};
pub use stats::TreeStats;
