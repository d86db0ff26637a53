//! # Persistence Worker
//!
//! Saves and publishes for one funnel run on a single task that takes
//! requests off a queue one at a time, so a save and a publish never
//! interleave their writes.
//!
//! ```text
//! PersisterHandle ──mpsc──▶ Persister task ──▶ FunnelStorage
//!        ▲                        │
//!        └──────── oneshot ───────┘
//! ```
//!
//! On top of the queue, the handle refuses a second request of the same
//! kind while one is outstanding (`is_saving` / `is_publishing`). The flag
//! travels with the queued request and is cleared by the worker once the
//! write has finished, even if the caller stopped waiting for the reply.

use crate::{create_published_snapshot, FunnelId, FunnelStorage, PersistError, PublishedDocumentSnapshot};
use funnel_document::EditorDocument;
use funnel_legacy::derive_legacy_payload_from_document;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

const QUEUE_DEPTH: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistKind {
    Save,
    Publish,
}

impl fmt::Display for PersistKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistKind::Save => f.write_str("save"),
            PersistKind::Publish => f.write_str("publish"),
        }
    }
}

enum PersistRequest {
    Save {
        document: EditorDocument,
        flight: InFlight,
        reply: oneshot::Sender<Result<(), PersistError>>,
    },
    Publish {
        document: EditorDocument,
        flight: InFlight,
        reply: oneshot::Sender<Result<PublishedDocumentSnapshot, PersistError>>,
    },
}

pub struct Persister {
    funnel_id: FunnelId,
    storage: Arc<dyn FunnelStorage>,
    rx: mpsc::Receiver<PersistRequest>,
}

impl Persister {
    /// Start the worker on the current tokio runtime.
    ///
    /// The task ends once every handle has been dropped.
    pub fn spawn(funnel_id: FunnelId, storage: Arc<dyn FunnelStorage>) -> PersisterHandle {
        let (tx, rx) = mpsc::channel(QUEUE_DEPTH);
        let persister = Persister {
            funnel_id,
            storage,
            rx,
        };
        tokio::spawn(persister.run());

        PersisterHandle {
            tx,
            saving: Arc::new(AtomicBool::new(false)),
            publishing: Arc::new(AtomicBool::new(false)),
        }
    }

    async fn run(mut self) {
        while let Some(request) = self.rx.recv().await {
            match request {
                // Release the flag before replying so the caller can
                // issue the next request as soon as it has the result.
                PersistRequest::Save {
                    document,
                    flight,
                    reply,
                } => {
                    let result = self.save(document).await;
                    drop(flight);
                    let _ = reply.send(result);
                }
                PersistRequest::Publish {
                    document,
                    flight,
                    reply,
                } => {
                    let result = self.publish(document).await;
                    drop(flight);
                    let _ = reply.send(result);
                }
            }
        }
        tracing::debug!(funnel = %self.funnel_id, "Persistence worker stopped");
    }

    async fn save(&self, document: EditorDocument) -> Result<(), PersistError> {
        match self.storage.write_draft(&self.funnel_id, &document).await {
            Ok(()) => {
                tracing::info!(funnel = %self.funnel_id, pages = document.pages.len(), "Draft saved");
                Ok(())
            }
            Err(e) => {
                tracing::error!(funnel = %self.funnel_id, error = %e, "Draft save failed");
                Err(e.into())
            }
        }
    }

    /// Validate, save the draft, then replace the published snapshot
    async fn publish(&self, document: EditorDocument) -> Result<PublishedDocumentSnapshot, PersistError> {
        let Some(legacy) = derive_legacy_payload_from_document(&document) else {
            tracing::warn!(funnel = %self.funnel_id, "Publish refused: no legacy steps");
            return Err(PersistError::NoLegacySteps);
        };

        let snapshot =
            create_published_snapshot(&document.pages, document.active_page_id.as_deref(), legacy);

        let written = async {
            self.storage.write_draft(&self.funnel_id, &document).await?;
            self.storage.write_published(&self.funnel_id, &snapshot).await
        };

        match written.await {
            Ok(()) => {
                tracing::info!(
                    funnel = %self.funnel_id,
                    steps = snapshot.legacy().len(),
                    published_at = %snapshot.published_at(),
                    "Funnel published"
                );
                Ok(snapshot)
            }
            Err(e) => {
                tracing::error!(funnel = %self.funnel_id, error = %e, "Publish failed");
                Err(e.into())
            }
        }
    }
}

/// Cheap to clone; every clone shares the same in-flight flags
#[derive(Clone)]
pub struct PersisterHandle {
    tx: mpsc::Sender<PersistRequest>,
    saving: Arc<AtomicBool>,
    publishing: Arc<AtomicBool>,
}

impl PersisterHandle {
    /// Write `document` as the draft
    pub async fn save(&self, document: EditorDocument) -> Result<(), PersistError> {
        let flight = InFlight::acquire(&self.saving, PersistKind::Save)?;

        let (reply, rx) = oneshot::channel();
        self.tx
            .send(PersistRequest::Save {
                document,
                flight,
                reply,
            })
            .await
            .map_err(|_| PersistError::Stopped)?;
        rx.await.map_err(|_| PersistError::Stopped)?
    }

    /// Save `document` and publish it
    pub async fn publish(&self, document: EditorDocument) -> Result<PublishedDocumentSnapshot, PersistError> {
        let flight = InFlight::acquire(&self.publishing, PersistKind::Publish)?;

        let (reply, rx) = oneshot::channel();
        self.tx
            .send(PersistRequest::Publish {
                document,
                flight,
                reply,
            })
            .await
            .map_err(|_| PersistError::Stopped)?;
        rx.await.map_err(|_| PersistError::Stopped)?
    }

    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::SeqCst)
    }

    pub fn is_publishing(&self) -> bool {
        self.publishing.load(Ordering::SeqCst)
    }
}

/// Holds a single-flight flag; released on drop
struct InFlight {
    flag: Arc<AtomicBool>,
}

impl InFlight {
    fn acquire(flag: &Arc<AtomicBool>, kind: PersistKind) -> Result<Self, PersistError> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| PersistError::AlreadyInFlight(kind))?;
        Ok(Self {
            flag: Arc::clone(flag),
        })
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStorage;
    use funnel_document::{default_document, IdGenerator};
    use std::time::Duration;

    #[test]
    fn test_in_flight_flag_is_released_on_drop() {
        let flag = Arc::new(AtomicBool::new(false));
        {
            let _held = InFlight::acquire(&flag, PersistKind::Save).unwrap();
            assert!(flag.load(Ordering::SeqCst));
            assert!(matches!(
                InFlight::acquire(&flag, PersistKind::Save),
                Err(PersistError::AlreadyInFlight(PersistKind::Save))
            ));
        }
        assert!(!flag.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_flags_clear_after_completion() {
        let storage = Arc::new(MemoryStorage::new());
        let handle = Persister::spawn(FunnelId::new("f").unwrap(), storage);
        let doc = default_document(&mut IdGenerator::from_seed("p"));

        handle.save(doc.clone()).await.unwrap();
        handle.publish(doc).await.unwrap();

        assert!(!handle.is_saving());
        assert!(!handle.is_publishing());
    }

    #[tokio::test]
    async fn test_abandoned_save_keeps_flag_until_written() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_write_delay(Duration::from_millis(100));
        let handle = Persister::spawn(FunnelId::new("f").unwrap(), storage.clone());
        let doc = default_document(&mut IdGenerator::from_seed("p"));

        // Queue a save, then stop waiting for it.
        let abandoned = tokio::time::timeout(Duration::from_millis(10), handle.save(doc.clone())).await;
        assert!(abandoned.is_err());

        assert!(handle.is_saving());
        assert!(matches!(
            handle.save(doc.clone()).await,
            Err(PersistError::AlreadyInFlight(PersistKind::Save))
        ));

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!handle.is_saving());
        assert!(storage
            .read_draft(&FunnelId::new("f").unwrap())
            .await
            .unwrap()
            .is_some());
        handle.save(doc).await.unwrap();
    }
}
