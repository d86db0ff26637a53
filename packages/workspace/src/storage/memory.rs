use super::{FunnelStorage, StoredDraft};
use crate::{FunnelId, FunnelStatus, PublishedDocumentSnapshot, StorageError};
use async_trait::async_trait;
use chrono::Utc;
use funnel_document::EditorDocument;
use funnel_legacy::LegacyStep;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct FunnelRecord {
    draft: Option<StoredDraft>,
    published: Option<PublishedDocumentSnapshot>,
    status: FunnelStatus,
    legacy_steps: Option<Vec<LegacyStep>>,
}

/// In-process storage. Writes can be made to fail or stall on demand.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    funnels: RwLock<HashMap<FunnelId, FunnelRecord>>,
    fail_writes: AtomicBool,
    fail_published_writes: AtomicBool,
    write_delay_ms: AtomicU64,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with [`StorageError::Unavailable`]
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make only snapshot writes fail; drafts are still written
    pub fn set_fail_published_writes(&self, fail: bool) {
        self.fail_published_writes.store(fail, Ordering::SeqCst);
    }

    /// Hold every subsequent write for `delay` before applying it
    pub fn set_write_delay(&self, delay: Duration) {
        self.write_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    /// Stand-in for the older builder writing its flat steps
    pub async fn insert_legacy_steps(&self, id: &FunnelId, steps: Vec<LegacyStep>) {
        let mut funnels = self.funnels.write().await;
        funnels.entry(id.clone()).or_default().legacy_steps = Some(steps);
    }

    async fn before_write(&self) -> Result<(), StorageError> {
        let delay = self.write_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("injected write failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl FunnelStorage for MemoryStorage {
    async fn read_draft(&self, id: &FunnelId) -> Result<Option<StoredDraft>, StorageError> {
        let funnels = self.funnels.read().await;
        Ok(funnels.get(id).and_then(|record| record.draft.clone()))
    }

    async fn write_draft(&self, id: &FunnelId, document: &EditorDocument) -> Result<(), StorageError> {
        self.before_write().await?;

        let mut funnels = self.funnels.write().await;
        funnels.entry(id.clone()).or_default().draft = Some(StoredDraft {
            document: document.clone(),
            updated_at: Utc::now(),
        });
        Ok(())
    }

    async fn read_published(
        &self,
        id: &FunnelId,
    ) -> Result<Option<PublishedDocumentSnapshot>, StorageError> {
        let funnels = self.funnels.read().await;
        Ok(funnels.get(id).and_then(|record| record.published.clone()))
    }

    async fn read_status(&self, id: &FunnelId) -> Result<FunnelStatus, StorageError> {
        let funnels = self.funnels.read().await;
        Ok(funnels.get(id).map(|record| record.status).unwrap_or_default())
    }

    async fn write_published(
        &self,
        id: &FunnelId,
        snapshot: &PublishedDocumentSnapshot,
    ) -> Result<(), StorageError> {
        self.before_write().await?;
        if self.fail_published_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("injected snapshot write failure".to_string()));
        }

        let mut funnels = self.funnels.write().await;
        let record = funnels.entry(id.clone()).or_default();
        record.published = Some(snapshot.clone());
        record.status = FunnelStatus::Published;
        Ok(())
    }

    async fn read_legacy_steps(&self, id: &FunnelId) -> Result<Option<Vec<LegacyStep>>, StorageError> {
        let funnels = self.funnels.read().await;
        Ok(funnels.get(id).and_then(|record| record.legacy_steps.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use funnel_document::{default_document, IdGenerator};

    fn funnel() -> FunnelId {
        FunnelId::new("promo").unwrap()
    }

    #[tokio::test]
    async fn test_unknown_funnel_reads_empty() {
        let storage = MemoryStorage::new();

        assert!(storage.read_draft(&funnel()).await.unwrap().is_none());
        assert!(storage.read_published(&funnel()).await.unwrap().is_none());
        assert_eq!(storage.read_status(&funnel()).await.unwrap(), FunnelStatus::Draft);
    }

    #[tokio::test]
    async fn test_draft_write_replaces_whole_document() {
        let storage = MemoryStorage::new();
        let mut ids = IdGenerator::from_seed("m");
        let first = default_document(&mut ids);
        let second = default_document(&mut ids);

        storage.write_draft(&funnel(), &first).await.unwrap();
        storage.write_draft(&funnel(), &second).await.unwrap();

        let stored = storage.read_draft(&funnel()).await.unwrap().unwrap();
        assert_eq!(stored.document, second);
    }

    #[tokio::test]
    async fn test_failed_write_keeps_prior_draft() {
        let storage = MemoryStorage::new();
        let mut ids = IdGenerator::from_seed("m");
        let first = default_document(&mut ids);

        storage.write_draft(&funnel(), &first).await.unwrap();
        storage.set_fail_writes(true);

        let result = storage
            .write_draft(&funnel(), &default_document(&mut ids))
            .await;
        assert!(matches!(result, Err(StorageError::Unavailable(_))));

        let stored = storage.read_draft(&funnel()).await.unwrap().unwrap();
        assert_eq!(stored.document, first);
    }
}
