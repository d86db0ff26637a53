use super::{FunnelStorage, PublishedRecord, StoredDraft};
use crate::{FunnelId, FunnelStatus, PublishedDocumentSnapshot, StorageError};
use async_trait::async_trait;
use chrono::Utc;
use funnel_document::EditorDocument;
use funnel_legacy::{parse_legacy_steps, LegacyStep};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const DRAFT_FILE: &str = "draft.json";
const PUBLISHED_FILE: &str = "published.json";
const LEGACY_STEPS_FILE: &str = "legacy_steps.json";

/// One directory per funnel under `root`, one JSON file per record.
///
/// ```text
/// <root>/<funnel-id>/draft.json
/// <root>/<funnel-id>/published.json      status + snapshot
/// <root>/<funnel-id>/legacy_steps.json   written by the older builder
/// ```
///
/// Files are written to a temporary sibling and renamed into place, so a
/// reader sees either the old record or the new one.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    root: PathBuf,
}

impl JsonFileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn funnel_dir(&self, id: &FunnelId) -> PathBuf {
        self.root.join(id.as_str())
    }

    /// Funnels that have at least one record on disk
    pub async fn list_funnels(&self) -> Result<Vec<FunnelId>, StorageError> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut funnels = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            match FunnelId::new(name) {
                Ok(id) => funnels.push(id),
                Err(e) => tracing::debug!(error = %e, "Skipping foreign directory"),
            }
        }
        funnels.sort();
        Ok(funnels)
    }

    /// Import flat steps as if the older builder had written them
    pub async fn write_legacy_steps(
        &self,
        id: &FunnelId,
        steps: &[LegacyStep],
    ) -> Result<(), StorageError> {
        self.write_json(id, LEGACY_STEPS_FILE, steps).await
    }

    async fn read_json<T: DeserializeOwned>(
        &self,
        id: &FunnelId,
        file: &str,
    ) -> Result<Option<T>, StorageError> {
        match self.read_text(id, file).await? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    async fn read_text(&self, id: &FunnelId, file: &str) -> Result<Option<String>, StorageError> {
        let path = self.funnel_dir(id).join(file);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_json<T: Serialize + ?Sized>(
        &self,
        id: &FunnelId,
        file: &str,
        value: &T,
    ) -> Result<(), StorageError> {
        let dir = self.funnel_dir(id);
        tokio::fs::create_dir_all(&dir).await?;

        let bytes = serde_json::to_vec_pretty(value)?;
        let target = dir.join(file);
        let temp = dir.join(format!(".{}.tmp", file));

        tokio::fs::write(&temp, &bytes).await?;
        if let Err(e) = tokio::fs::rename(&temp, &target).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(e.into());
        }

        tracing::debug!(path = %target.display(), bytes = bytes.len(), "Wrote record");
        Ok(())
    }
}

#[async_trait]
impl FunnelStorage for JsonFileStorage {
    async fn read_draft(&self, id: &FunnelId) -> Result<Option<StoredDraft>, StorageError> {
        self.read_json(id, DRAFT_FILE).await
    }

    async fn write_draft(&self, id: &FunnelId, document: &EditorDocument) -> Result<(), StorageError> {
        let draft = StoredDraft {
            document: document.clone(),
            updated_at: Utc::now(),
        };
        self.write_json(id, DRAFT_FILE, &draft).await
    }

    async fn read_published(
        &self,
        id: &FunnelId,
    ) -> Result<Option<PublishedDocumentSnapshot>, StorageError> {
        let record: Option<PublishedRecord> = self.read_json(id, PUBLISHED_FILE).await?;
        Ok(record.map(|r| r.snapshot))
    }

    async fn read_status(&self, id: &FunnelId) -> Result<FunnelStatus, StorageError> {
        let record: Option<PublishedRecord> = self.read_json(id, PUBLISHED_FILE).await?;
        Ok(record.map(|r| r.status).unwrap_or_default())
    }

    async fn write_published(
        &self,
        id: &FunnelId,
        snapshot: &PublishedDocumentSnapshot,
    ) -> Result<(), StorageError> {
        let record = PublishedRecord {
            status: FunnelStatus::Published,
            snapshot: snapshot.clone(),
        };
        self.write_json(id, PUBLISHED_FILE, &record).await
    }

    async fn read_legacy_steps(&self, id: &FunnelId) -> Result<Option<Vec<LegacyStep>>, StorageError> {
        let Some(text) = self.read_text(id, LEGACY_STEPS_FILE).await? else {
            return Ok(None);
        };

        parse_legacy_steps(&text).map(Some).map_err(|e| match e {
            funnel_legacy::LegacyError::Parse(e) => StorageError::Serialization(e),
            other => StorageError::Unavailable(other.to_string()),
        })
    }
}
