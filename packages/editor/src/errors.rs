//! Error types for the editor

use crate::node::NodeId;
use thiserror::Error;

/// Errors surfaced to the user.
///
/// Only validation failures reach the caller as `Err`. Everything wrapped
/// in [`EditorError::Mutation`] is swallowed by the session and reported
/// as "nothing changed".
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error("Invalid class name: {0:?}")]
    InvalidClassName(String),

    #[error("Class already exists: {0}")]
    ClassExists(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Mutation rejected: {0}")]
    Mutation(#[from] MutationError),
}

impl From<serde_json::Error> for EditorError {
    fn from(e: serde_json::Error) -> Self {
        EditorError::InvalidInput(e.to_string())
    }
}

/// Reasons a structural operation was refused.
///
/// These are expected, frequent conditions (stale selection, drop onto a
/// locked subtree) and never leave partial state behind.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Parent not found: {0}")]
    ParentNotFound(NodeId),

    #[error("Class not found: {0}")]
    ClassNotFound(String),

    #[error("Would create cycle")]
    CycleDetected,

    #[error("Node cannot have children: {0}")]
    NotAContainer(NodeId),

    #[error("Root node cannot be moved or restyled this way")]
    RootImmutable,

    #[error("Node is locked: {0}")]
    Locked(NodeId),

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),

    #[error("Duplicate node id: {0}")]
    DuplicateId(NodeId),

    #[error("Cannot drop a node onto itself")]
    SelfDrop,

    #[error("Nothing to do")]
    Unchanged,
}
