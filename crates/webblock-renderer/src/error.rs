//! Renderer errors.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    /// A patch addressed a node that does not exist in the target tree.
    #[error("no node at patch path {path:?}")]
    MissingPatchTarget { path: Vec<usize> },
    /// The node a strategy retained was removed from the attach point.
    #[error("retained node is no longer in the attach point")]
    LostRetainedNode,
    /// The attach point was still borrowed when output was ready.
    #[error("attach point is already borrowed")]
    AttachPointBusy,
    /// The component library reported a failure.
    #[error("component library error: {0}")]
    Component(String),
}
