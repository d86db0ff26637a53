//! # Funnel Session
//!
//! One editing session for one funnel: an [`EditorStore`] hydrated from
//! storage, plus the persistence worker its saves and publishes go through.
//! Sessions are constructed explicitly and passed around; there is no
//! global store.

use crate::{
    FunnelId, FunnelStatus, FunnelStorage, PersistError, Persister, PersisterHandle,
    PublishedDocumentSnapshot,
};
use funnel_document::{default_document, EditorDocument, IdGenerator};
use funnel_editor::{EditorStore, DEFAULT_HISTORY_LIMIT};
use funnel_legacy::create_legacy_editor_document;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Undo depth (0 = unlimited)
    pub history_limit: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

/// Where the session's starting document came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HydrationSource {
    Draft,
    LegacySteps,
    Default,
}

pub struct FunnelSession {
    funnel_id: FunnelId,
    store: EditorStore,
    storage: Arc<dyn FunnelStorage>,
    persister: PersisterHandle,
    source: HydrationSource,
}

impl FunnelSession {
    /// Open a funnel: stored draft first, then legacy steps, then the
    /// default document.
    pub async fn open(
        funnel_id: FunnelId,
        storage: Arc<dyn FunnelStorage>,
        options: SessionOptions,
    ) -> Result<Self, PersistError> {
        let mut ids = IdGenerator::new();
        let (document, source) = Self::load_document(&funnel_id, storage.as_ref(), &mut ids).await?;

        tracing::info!(
            funnel = %funnel_id,
            source = ?source,
            pages = document.pages.len(),
            "Opened funnel"
        );

        let store = EditorStore::with_id_generator(document, ids, options.history_limit);
        let persister = Persister::spawn(funnel_id.clone(), storage.clone());

        Ok(Self {
            funnel_id,
            store,
            storage,
            persister,
            source,
        })
    }

    async fn load_document(
        funnel_id: &FunnelId,
        storage: &dyn FunnelStorage,
        ids: &mut IdGenerator,
    ) -> Result<(EditorDocument, HydrationSource), PersistError> {
        if let Some(draft) = storage.read_draft(funnel_id).await? {
            return Ok((draft.document, HydrationSource::Draft));
        }

        if let Some(steps) = storage.read_legacy_steps(funnel_id).await? {
            if !steps.is_empty() {
                let document = create_legacy_editor_document(&steps, ids);
                return Ok((document, HydrationSource::LegacySteps));
            }
        }

        Ok((default_document(ids), HydrationSource::Default))
    }

    pub fn funnel_id(&self) -> &FunnelId {
        &self.funnel_id
    }

    pub fn source(&self) -> HydrationSource {
        self.source
    }

    pub fn store(&self) -> &EditorStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut EditorStore {
        &mut self.store
    }

    /// Handle for issuing saves from another task while editing continues
    pub fn persister(&self) -> PersisterHandle {
        self.persister.clone()
    }

    /// Save the current draft. Status is left as it is.
    pub async fn save_draft(&self) -> Result<(), PersistError> {
        self.persister.save(self.store.extract_document()).await
    }

    /// Save the current draft and publish it
    pub async fn publish(&self) -> Result<PublishedDocumentSnapshot, PersistError> {
        self.persister.publish(self.store.extract_document()).await
    }

    pub async fn status(&self) -> Result<FunnelStatus, PersistError> {
        Ok(self.storage.read_status(&self.funnel_id).await?)
    }

    pub async fn published(&self) -> Result<Option<PublishedDocumentSnapshot>, PersistError> {
        Ok(self.storage.read_published(&self.funnel_id).await?)
    }

    pub fn is_saving(&self) -> bool {
        self.persister.is_saving()
    }

    pub fn is_publishing(&self) -> bool {
        self.persister.is_publishing()
    }
}
