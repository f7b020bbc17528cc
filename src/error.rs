use thiserror::Error;

use crate::dom::NodeId;
use crate::trigger::BindingId;
use crate::window::WindowId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomError {
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),
    #[error("node {reference:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, reference: NodeId },
    #[error("inserting {node:?} under {parent:?} would create a cycle")]
    Cycle { parent: NodeId, node: NodeId },
    #[error("node {0:?} has no parent")]
    Detached(NodeId),
    #[error("node {0:?} is still attached")]
    Attached(NodeId),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PopoutError {
    #[error(transparent)]
    Dom(#[from] DomError),
    #[error("node {0:?} is already floating")]
    AlreadyFloating(NodeId),
    #[error("node {0:?} already has a window binding")]
    AlreadyBound(NodeId),
    #[error("unknown window {0:?}")]
    UnknownWindow(WindowId),
    #[error("unknown binding {0:?}")]
    UnknownBinding(BindingId),
}
