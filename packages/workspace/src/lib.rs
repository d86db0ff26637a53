//! # Funnel Workspace
//!
//! Persistence around the editor: draft saves, publish snapshots, storage
//! backends and the per-funnel editing session.
//!
//! ## Lifecycle
//!
//! ```text
//! draft ──publish (needs legacy steps)──▶ published ──save/publish──▶ published
//! ```
//!
//! Saves only replace the draft. Only a publish replaces the snapshot that
//! serves live traffic.

mod errors;
mod funnel;
mod persister;
mod session;
mod snapshot;
mod storage;

pub use errors::{PersistError, StorageError};
pub use funnel::{FunnelId, FunnelStatus};
pub use persister::{PersistKind, Persister, PersisterHandle};
pub use session::{FunnelSession, HydrationSource, SessionOptions};
pub use snapshot::{create_published_snapshot, create_published_snapshot_at, PublishedDocumentSnapshot};
pub use storage::{FunnelStorage, JsonFileStorage, MemoryStorage, StoredDraft};
