//! Error types for the document model

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocumentError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Parent not found: {0}")]
    ParentNotFound(String),

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Duplicate id: {0}")]
    DuplicateId(String),

    #[error("Node {0} cannot have children")]
    NotAContainer(String),

    #[error("The canvas root cannot be removed or moved")]
    CannotDetachRoot,

    #[error("Would create cycle")]
    CycleDetected,

    #[error("Invalid props for {node_type}: {reason}")]
    InvalidProps { node_type: String, reason: String },

    #[error("Active page {0} does not exist")]
    DanglingActivePage(String),

    #[error("Document has pages but no active page")]
    MissingActivePage,
}
