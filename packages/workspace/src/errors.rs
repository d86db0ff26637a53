use crate::PersistKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid funnel id: {0:?}")]
    InvalidFunnelId(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt record: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Why a save or publish did not happen. Always safe to retry.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Nothing to publish: no page maps onto a legacy step")]
    NoLegacySteps,

    #[error("A {0} is already in flight")]
    AlreadyInFlight(PersistKind),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Persistence worker has stopped")]
    Stopped,
}
