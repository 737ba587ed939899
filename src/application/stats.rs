//! Shape summary of a tree

use std::fmt;

use tracing::instrument;

use crate::application::ApplicationResult;
use crate::domain::{Ast, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeStats {
    pub nodes: usize,
    pub depth: usize,
    pub leaves: usize,
    /// Parent to child links; always `nodes - 1` for a non-empty tree
    pub edges: usize,
}

impl TreeStats {
    #[instrument(level = "debug", skip(ast))]
    pub fn collect(ast: &Ast, root: NodeId) -> ApplicationResult<Self> {
        let mut stats = Self {
            nodes: 0,
            depth: 0,
            leaves: 0,
            edges: 0,
        };
        for visit in ast.preorder(root)? {
            stats.nodes += 1;
            stats.depth = stats.depth.max(visit.depth + 1);
            stats.edges += visit.node.child_count();
            if visit.node.is_leaf() {
                stats.leaves += 1;
            }
        }
        Ok(stats)
    }
}

impl fmt::Display for TreeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "nodes:  {}", self.nodes)?;
        writeln!(f, "depth:  {}", self.depth)?;
        writeln!(f, "leaves: {}", self.leaves)?;
        write!(f, "edges:  {}", self.edges)
    }
}
