use thiserror::Error;

use crate::element::NodeId;

/// Errors from structural document operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// The node is not (or no longer) part of the document.
    #[error("Node {0} not found")]
    NodeNotFound(NodeId),

    /// The insertion would make a node its own ancestor.
    #[error("Cannot append {child} to {parent}: would create a cycle")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    /// The document root cannot be removed.
    #[error("Cannot remove the document root")]
    RemoveRoot,
}
