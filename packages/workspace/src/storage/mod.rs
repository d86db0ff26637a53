//! Storage collaborator for drafts, published snapshots and legacy steps.
//!
//! Every write replaces a whole record. Two sessions editing the same
//! funnel overwrite each other's draft (last write wins).

mod file;
mod memory;

pub use file::JsonFileStorage;
pub use memory::MemoryStorage;

use crate::{FunnelId, FunnelStatus, PublishedDocumentSnapshot, StorageError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use funnel_document::EditorDocument;
use funnel_legacy::LegacyStep;
use serde::{Deserialize, Serialize};

#[async_trait]
pub trait FunnelStorage: Send + Sync {
    async fn read_draft(&self, id: &FunnelId) -> Result<Option<StoredDraft>, StorageError>;

    async fn write_draft(&self, id: &FunnelId, document: &EditorDocument) -> Result<(), StorageError>;

    async fn read_published(
        &self,
        id: &FunnelId,
    ) -> Result<Option<PublishedDocumentSnapshot>, StorageError>;

    async fn read_status(&self, id: &FunnelId) -> Result<FunnelStatus, StorageError>;

    /// Replace the published snapshot and mark the funnel published.
    ///
    /// Both change together or neither does.
    async fn write_published(
        &self,
        id: &FunnelId,
        snapshot: &PublishedDocumentSnapshot,
    ) -> Result<(), StorageError>;

    /// Steps written by the older flat-step builder, if any
    async fn read_legacy_steps(&self, id: &FunnelId) -> Result<Option<Vec<LegacyStep>>, StorageError>;
}

/// A draft as stored, stamped by the storage layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDraft {
    pub document: EditorDocument,
    pub updated_at: DateTime<Utc>,
}

/// Published snapshot and status, kept in one record so they flip together
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PublishedRecord {
    pub status: FunnelStatus,
    pub snapshot: PublishedDocumentSnapshot,
}
