//! Error types for the editor

use funnel_document::DocumentError;
use thiserror::Error;

/// Reason a dispatch was rejected. The store is unchanged whenever one of
/// these is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Cannot delete the last remaining page")]
    LastPage,

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("No active page")]
    NoActivePage,

    #[error(transparent)]
    Document(#[from] DocumentError),
}
