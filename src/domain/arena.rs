//! Arena-backed node store.
//!
//! Nodes live in a generational arena and are addressed by [`NodeId`]
//! handles. A handle to a node that has been freed is detected as stale
//! instead of dangling.

use std::collections::HashSet;
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::error::{DomainError, DomainResult, TreeViolation};
use crate::domain::kind::NodeKind;
use crate::domain::payload::Payload;

/// Handle to a node inside an [`Ast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Index);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.0.into_raw_parts();
        write!(f, "node {}v{}", slot, generation)
    }
}

/// A single tree node.
#[derive(Debug)]
pub struct Node {
    kind: NodeKind,
    payload: Payload,
    /// Owned children, in semantic order
    children: Vec<NodeId>,
    /// Arena bookkeeping for ownership checks, not exposed
    owner: Option<NodeId>,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Owns every node of one or more trees.
///
/// Each node is owned by at most one parent. Nodes without a parent are
/// roots and belong to the caller until they are attached or freed.
#[derive(Debug, Default)]
pub struct Ast {
    nodes: Arena<Node>,
}

impl Ast {
    pub fn new() -> Self {
        Self {
            nodes: Arena::new(),
        }
    }

    /// Creates a detached node with no children.
    #[instrument(level = "trace", skip(self))]
    pub fn create(&mut self, kind: NodeKind, payload: Payload) -> DomainResult<NodeId> {
        if !kind.accepts(&payload) {
            return Err(DomainError::PayloadMismatch {
                kind,
                payload: payload.shape(),
            });
        }
        let idx = self.nodes.insert(Node {
            kind,
            payload,
            children: Vec::new(),
            owner: None,
        });
        Ok(NodeId(idx))
    }

    /// Appends `child` as the last child of `parent`, transferring ownership.
    #[instrument(level = "trace", skip(self))]
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> DomainResult<()> {
        self.node(parent)?;
        let child_node = self.node(child)?;

        if child == parent {
            return Err(DomainError::invalid(child, TreeViolation::Cycle));
        }
        if child_node.owner.is_some() {
            return Err(DomainError::invalid(child, TreeViolation::AlreadyOwned));
        }
        // child is a root here, so it closes a cycle only if it sits above parent
        if self.ancestors(parent).any(|a| a == child) {
            return Err(DomainError::invalid(child, TreeViolation::Cycle));
        }

        self.attach(parent, child);
        Ok(())
    }

    /// Creates a structural node and attaches `children` in order.
    ///
    /// All children are checked before anything is created, so on error the
    /// store is left untouched.
    pub fn subtree<I>(&mut self, kind: NodeKind, children: I) -> DomainResult<NodeId>
    where
        I: IntoIterator<Item = NodeId>,
    {
        self.subtree_with(kind, Payload::None, children)
    }

    /// Like [`Ast::subtree`] for parents that carry a payload.
    #[instrument(level = "trace", skip(self, children))]
    pub fn subtree_with<I>(
        &mut self,
        kind: NodeKind,
        payload: Payload,
        children: I,
    ) -> DomainResult<NodeId>
    where
        I: IntoIterator<Item = NodeId>,
    {
        let children: Vec<NodeId> = children.into_iter().collect();

        let mut seen = HashSet::with_capacity(children.len());
        for &child in &children {
            if self.node(child)?.owner.is_some() || !seen.insert(child) {
                return Err(DomainError::invalid(child, TreeViolation::AlreadyOwned));
            }
        }

        let parent = self.create(kind, payload)?;
        for child in children {
            self.attach(parent, child);
        }
        Ok(parent)
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        if let Some(node) = self.nodes.get_mut(child.0) {
            node.owner = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(parent.0) {
            node.children.push(child);
        }
    }

    pub(super) fn release(&mut self, id: NodeId) {
        self.nodes.remove(id.0);
    }

    fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.nodes.get(id.0).and_then(|n| n.owner), move |a| {
            self.nodes.get(a.0).and_then(|n| n.owner)
        })
    }

    #[instrument(level = "trace", skip(self))]
    pub fn node(&self, id: NodeId) -> DomainResult<&Node> {
        self.nodes
            .get(id.0)
            .ok_or(DomainError::invalid(id, TreeViolation::Stale))
    }

    pub fn kind(&self, id: NodeId) -> DomainResult<NodeKind> {
        Ok(self.node(id)?.kind)
    }

    pub fn payload(&self, id: NodeId) -> DomainResult<&Payload> {
        Ok(&self.node(id)?.payload)
    }

    pub fn child_count(&self, id: NodeId) -> DomainResult<usize> {
        Ok(self.node(id)?.children.len())
    }

    pub fn children(&self, id: NodeId) -> DomainResult<&[NodeId]> {
        Ok(&self.node(id)?.children)
    }

    /// Bounds-checked child lookup.
    #[instrument(level = "trace", skip(self))]
    pub fn child(&self, parent: NodeId, idx: usize) -> DomainResult<NodeId> {
        let children = &self.node(parent)?.children;
        children
            .get(idx)
            .copied()
            .ok_or(DomainError::IndexOutOfRange {
                index: idx,
                count: children.len(),
            })
    }

    /// True when no parent owns the node.
    pub fn is_root(&self, id: NodeId) -> DomainResult<bool> {
        Ok(self.node(id)?.owner.is_none())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains(id.0)
    }

    /// Number of live nodes across all trees.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All unowned nodes, in arena slot order.
    pub fn roots(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, n)| n.owner.is_none())
            .map(|(idx, _)| NodeId(idx))
            .collect()
    }

    #[instrument(level = "trace", skip(self))]
    pub fn preorder(&self, root: NodeId) -> DomainResult<PreOrder<'_>> {
        self.node(root)?;
        Ok(PreOrder {
            ast: self,
            stack: vec![(root, 0)],
        })
    }

    #[instrument(level = "trace", skip(self))]
    pub fn postorder(&self, root: NodeId) -> DomainResult<PostOrder<'_>> {
        self.node(root)?;
        Ok(PostOrder {
            ast: self,
            stack: vec![(root, false)],
        })
    }

    /// Number of levels in the tree; a lone node has depth 1.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self, root: NodeId) -> DomainResult<usize> {
        Ok(self.preorder(root)?.map(|v| v.depth + 1).max().unwrap_or(0))
    }

    pub fn subtree_size(&self, root: NodeId) -> DomainResult<usize> {
        Ok(self.preorder(root)?.count())
    }

    /// Leaf nodes, left to right.
    #[instrument(level = "debug", skip(self))]
    pub fn leaves(&self, root: NodeId) -> DomainResult<Vec<NodeId>> {
        Ok(self
            .preorder(root)?
            .filter(|v| v.node.is_leaf())
            .map(|v| v.id)
            .collect())
    }
}

/// One step of a pre-order walk.
#[derive(Debug, Clone, Copy)]
pub struct Visit<'a> {
    pub id: NodeId,
    /// Distance from the walk's root, which has depth 0
    pub depth: usize,
    pub node: &'a Node,
}

/// Node before children, children left to right.
pub struct PreOrder<'a> {
    ast: &'a Ast,
    stack: Vec<(NodeId, usize)>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = Visit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((id, depth)) = self.stack.pop() {
            if let Some(node) = self.ast.nodes.get(id.0) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push((child, depth + 1));
                }
                return Some(Visit { id, depth, node });
            }
        }
        None
    }
}

/// Children left to right, then the node.
pub struct PostOrder<'a> {
    ast: &'a Ast,
    stack: Vec<(NodeId, bool)>,
}

impl<'a> Iterator for PostOrder<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((id, visited)) = self.stack.pop() {
            if let Some(node) = self.ast.nodes.get(id.0) {
                if visited {
                    return Some((id, node));
                }
                self.stack.push((id, true));
                for &child in node.children.iter().rev() {
                    self.stack.push((child, false));
                }
            }
        }
        None
    }
}
