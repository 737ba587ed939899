//! Tree teardown

use tracing::{debug, instrument};

use crate::domain::arena::{Ast, NodeId};
use crate::domain::error::{DomainError, DomainResult, TreeViolation};

impl Ast {
    /// Releases `root` and everything below it, children before parents.
    ///
    /// Returns the number of nodes released. Every handle into the freed
    /// tree becomes stale: a second call on the same root fails with
    /// [`TreeViolation::Stale`] instead of touching freed memory.
    #[instrument(level = "debug", skip(self))]
    pub fn free_tree(&mut self, root: NodeId) -> DomainResult<usize> {
        if !self.is_root(root)? {
            return Err(DomainError::invalid(root, TreeViolation::NotRoot));
        }

        let doomed: Vec<NodeId> = self.postorder(root)?.map(|(id, _)| id).collect();
        for &id in &doomed {
            self.release(id);
        }
        debug!("freed {} nodes, {} remaining", doomed.len(), self.len());
        Ok(doomed.len())
    }

    /// Drops every tree in the store at once.
    ///
    /// Consumes the store, so no handle can be used afterwards.
    #[instrument(level = "debug", skip(self))]
    pub fn destroy(self) -> usize {
        let released = self.len();
        drop(self);
        released
    }
}
