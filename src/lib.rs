//! Arena-backed abstract syntax tree for a small-language compiler front end.
//!
//! The [`domain`] layer owns the node store: creation, child attachment,
//! bounds-checked queries and teardown. The [`application`] layer renders
//! trees as indented text, Graphviz DOT or a box-drawing view, and loads
//! TOML tree documents. [`cli`] and [`config`] back the `astree` binary.
//!
//! ```
//! use astree::domain::{Ast, NodeKind, Payload};
//! use astree::application::{render_text, TextStyle};
//!
//! let mut ast = Ast::new();
//! let two = ast.create(NodeKind::Num, Payload::Int(2)).unwrap();
//! let three = ast.create(NodeKind::Num, Payload::Int(3)).unwrap();
//! let plus = ast.subtree(NodeKind::Plus, [two, three]).unwrap();
//!
//! let text = render_text(&ast, plus, &TextStyle::default()).unwrap();
//! assert_eq!(text, "PLUS\n    NUM 2\n    NUM 3\n");
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;
