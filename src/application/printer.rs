//! Tree rendering: indented text, Graphviz DOT, and box-drawing views.
//!
//! All renderers walk the tree once in pre-order, children left to right,
//! so identical trees always produce identical output.

use std::collections::HashMap;
use std::fmt::{self, Write};

use serde::{Deserialize, Serialize};
use termtree::Tree;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{Ast, DomainError, Node, NodeId, TreeViolation};

/// Longest run of spaces written in one call.
const PAD_CHUNK: usize = 1024;

/// Layout of the indented text rendering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TextStyle {
    /// Spaces per tree level
    pub indent: usize,
    /// Append the payload to value-bearing nodes
    pub show_payload: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            indent: 4,
            show_payload: true,
        }
    }
}

/// Graph-level attributes of the DOT rendering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GraphStyle {
    pub name: String,
    pub node_shape: String,
    pub rankdir: String,
}

impl Default for GraphStyle {
    fn default() -> Self {
        Self {
            name: "ast".into(),
            node_shape: "box".into(),
            rankdir: "TB".into(),
        }
    }
}

/// `KIND` for structural nodes, `KIND payload` for value-bearing ones.
pub fn label(node: &Node, show_payload: bool) -> String {
    if show_payload && !node.payload().is_none() {
        format!("{} {}", node.kind(), node.payload())
    } else {
        node.kind().to_string()
    }
}

/// Writes one line per node, indented by depth.
#[instrument(level = "debug", skip(ast, out))]
pub fn write_text<W: Write>(
    ast: &Ast,
    root: NodeId,
    style: &TextStyle,
    out: &mut W,
) -> ApplicationResult<()> {
    let blank = " ".repeat(PAD_CHUNK);
    for visit in ast.preorder(root)? {
        let width = visit.depth.checked_mul(style.indent).ok_or(fmt::Error)?;
        pad(out, &blank, width)?;
        writeln!(out, "{}", label(visit.node, style.show_payload))?;
    }
    Ok(())
}

/// Writes a complete `digraph` document.
///
/// Nodes are named `n0`, `n1`, ... by pre-order position rather than
/// arena slot, so the output depends only on tree shape and content.
#[instrument(level = "debug", skip(ast, out))]
pub fn write_dot<W: Write>(
    ast: &Ast,
    root: NodeId,
    style: &GraphStyle,
    out: &mut W,
) -> ApplicationResult<()> {
    let mut numbering: HashMap<NodeId, usize> = HashMap::new();

    writeln!(out, "digraph \"{}\" {{", escape_label(&style.name))?;
    writeln!(out, "    rankdir={};", style.rankdir)?;
    writeln!(out, "    node [shape={}];", style.node_shape)?;

    for (n, visit) in ast.preorder(root)?.enumerate() {
        numbering.insert(visit.id, n);
        writeln!(
            out,
            "    n{} [label=\"{}\"];",
            n,
            escape_label(&label(visit.node, true))
        )?;
    }

    let mut edges = 0;
    for visit in ast.preorder(root)? {
        let from = numbering[&visit.id];
        for child in visit.node.children() {
            writeln!(out, "    n{} -> n{};", from, numbering[child])?;
            edges += 1;
        }
    }

    writeln!(out, "}}")?;
    debug!("dot: {} nodes, {} edges", numbering.len(), edges);
    Ok(())
}

pub fn render_text(ast: &Ast, root: NodeId, style: &TextStyle) -> ApplicationResult<String> {
    let mut out = String::new();
    write_text(ast, root, style, &mut out)?;
    Ok(out)
}

pub fn render_dot(ast: &Ast, root: NodeId, style: &GraphStyle) -> ApplicationResult<String> {
    let mut out = String::new();
    write_dot(ast, root, style, &mut out)?;
    Ok(out)
}

/// Box-drawing view of the tree, labels as in the text rendering.
///
/// Built bottom-up from a post-order walk. Dropping a `termtree::Tree`
/// recurses once per level, so prefer [`write_text`] for trees that are
/// tens of thousands of levels deep.
#[instrument(level = "debug", skip(ast))]
pub fn to_term_tree(
    ast: &Ast,
    root: NodeId,
    show_payload: bool,
) -> ApplicationResult<Tree<String>> {
    let mut built: Vec<Tree<String>> = Vec::new();
    for (_, node) in ast.postorder(root)? {
        // children were finished last, in order, on top of the stack
        let leaves = built.split_off(built.len().saturating_sub(node.child_count()));
        built.push(Tree::new(label(node, show_payload)).with_leaves(leaves));
    }
    built.pop().ok_or_else(|| {
        ApplicationError::from(DomainError::InvalidTreeState {
            node: root,
            violation: TreeViolation::Stale,
        })
    })
}

/// Writes `width` spaces, at most `blank.len()` per call.
fn pad<W: Write>(out: &mut W, blank: &str, mut width: usize) -> fmt::Result {
    while width > 0 {
        let chunk = width.min(blank.len());
        out.write_str(&blank[..chunk])?;
        width -= chunk;
    }
    Ok(())
}

fn escape_label(label: &str) -> String {
    label
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
