//! Tree description documents.
//!
//! A document is a TOML rendering of an already-built tree:
//!
//! ```toml
//! [root]
//! kind = "PLUS"
//! children = [
//!     { kind = "NUM", int = 2 },
//!     { kind = "NUM", int = 3 },
//! ]
//! ```
//!
//! Each node table names its `kind`, sets at most one of `int`, `symbol`
//! or `text`, and lists its `children` in order.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{Ast, NodeId, NodeKind, Payload};

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TreeDocument {
    pub root: NodeSpec,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct NodeSpec {
    pub kind: NodeKind,
    #[serde(default)]
    pub int: Option<i64>,
    #[serde(default)]
    pub symbol: Option<usize>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    fn payload(&self) -> Result<Payload, String> {
        match (&self.int, &self.symbol, &self.text) {
            (None, None, None) => Ok(Payload::None),
            (Some(n), None, None) => Ok(Payload::Int(*n)),
            (None, Some(idx), None) => Ok(Payload::Symbol(*idx)),
            (None, None, Some(s)) => Ok(Payload::Text(s.clone())),
            _ => Err(format!(
                "{} node sets more than one of int, symbol, text",
                self.kind
            )),
        }
    }
}

impl TreeDocument {
    /// Parse document text; `origin` is only used in error messages.
    pub fn parse(content: &str, origin: &Path) -> ApplicationResult<Self> {
        toml::from_str(content).map_err(|e| ApplicationError::Document {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
    }

    #[instrument(level = "debug")]
    pub fn load(path: &Path) -> ApplicationResult<Self> {
        let content = fs::read_to_string(path).with_path_context("read tree document", path)?;
        Self::parse(&content, path)
    }

    /// Builds the described tree into `ast` bottom-up and returns its root.
    ///
    /// On error nothing built for this document is left in `ast`.
    #[instrument(level = "debug", skip(self, ast))]
    pub fn build(&self, ast: &mut Ast, origin: &Path) -> ApplicationResult<NodeId> {
        let root = build_node(&self.root, ast, origin)?;
        debug!("built tree with {} nodes", ast.subtree_size(root)?);
        Ok(root)
    }
}

fn build_node(spec: &NodeSpec, ast: &mut Ast, origin: &Path) -> ApplicationResult<NodeId> {
    let payload = spec.payload().map_err(|message| document_error(origin, message))?;

    let mut children = Vec::with_capacity(spec.children.len());
    for child in &spec.children {
        match build_node(child, ast, origin) {
            Ok(id) => children.push(id),
            Err(e) => return Err(discard(ast, &children, e)),
        }
    }

    ast.subtree_with(spec.kind, payload, children.iter().copied())
        .map_err(|e| discard(ast, &children, e.into()))
}

/// Frees already built sibling subtrees before reporting `err`.
fn discard(ast: &mut Ast, built: &[NodeId], err: ApplicationError) -> ApplicationError {
    for &id in built {
        if let Err(e) = ast.free_tree(id) {
            debug!("discard {}: {}", id, e);
        }
    }
    err
}

fn document_error(origin: &Path, message: String) -> ApplicationError {
    ApplicationError::Document {
        path: PathBuf::from(origin),
        message,
    }
}
