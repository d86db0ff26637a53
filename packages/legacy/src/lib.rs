//! # Funnel Legacy
//!
//! Bridges tree documents and the flat step list that the public runtime
//! and the older builder still read.
//!
//! The forward direction ([`derive_legacy_payload_from_document`]) is a
//! best-effort view: only the fields the flat format defines survive it.
//! The inverse ([`create_legacy_editor_document`]) seeds a tree document
//! from an old funnel that was never opened in the tree editor.

mod derive;
mod error;
mod hydrate;
mod step;

pub use derive::{derive_legacy_payload_from_document, require_legacy_payload};
pub use error::LegacyError;
pub use hydrate::create_legacy_editor_document;
pub use step::{parse_legacy_steps, LegacyContent, LegacySnapshotPayload, LegacyStep};
