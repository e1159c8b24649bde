//! Errors reported by the field sequence controller.

use thiserror::Error;

use crate::tree::NodeId;

/// Errors returned while constructing or initializing a
/// [`FieldSequenceController`](crate::FieldSequenceController).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The controller was given no fields to manage.
    #[error("field sequence must contain at least one field")]
    EmptySequence,
    /// `initialize` was called on a controller that already registered its
    /// listeners.
    #[error("field sequence controller is already initialized")]
    AlreadyInitialized,
    /// The controller node is not attached under a root canvas.
    #[error("node {node:?} has no root canvas")]
    NoRootCanvas {
        /// Node the lookup started from.
        node: NodeId,
    },
    /// The ancestor chain below the root canvas is too short to contain a
    /// follow panel.
    #[error("follow panel lookup out of range: ancestor chain has depth {depth}, need at least 2")]
    PanelOutOfRange {
        /// Number of nodes between the controller node (inclusive) and the
        /// root canvas (exclusive).
        depth: usize,
    },
}

/// Convenience alias for results carrying [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;
