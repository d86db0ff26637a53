//! # Publish Snapshots
//!
//! The immutable value that serves live traffic. The runtime reads only
//! `legacy`; `pages` is kept so the tree editor can show what is live.

use chrono::{DateTime, Utc};
use funnel_document::{Page, DOCUMENT_VERSION};
use funnel_legacy::LegacySnapshotPayload;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedDocumentSnapshot {
    version: u32,
    published_at: DateTime<Utc>,
    pages: Vec<Page>,
    #[serde(default)]
    active_page_id: Option<String>,
    legacy: LegacySnapshotPayload,
}

impl PublishedDocumentSnapshot {
    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn published_at(&self) -> DateTime<Utc> {
        self.published_at
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn active_page_id(&self) -> Option<&str> {
        self.active_page_id.as_deref()
    }

    pub fn legacy(&self) -> &LegacySnapshotPayload {
        &self.legacy
    }
}

/// Stamp a snapshot with the current time. Never touches storage.
pub fn create_published_snapshot(
    pages: &[Page],
    active_page_id: Option<&str>,
    legacy: LegacySnapshotPayload,
) -> PublishedDocumentSnapshot {
    create_published_snapshot_at(pages, active_page_id, legacy, Utc::now())
}

pub fn create_published_snapshot_at(
    pages: &[Page],
    active_page_id: Option<&str>,
    legacy: LegacySnapshotPayload,
    published_at: DateTime<Utc>,
) -> PublishedDocumentSnapshot {
    PublishedDocumentSnapshot {
        version: DOCUMENT_VERSION,
        published_at,
        pages: pages.to_vec(),
        active_page_id: active_page_id.map(str::to_string),
        legacy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use funnel_document::{default_document, IdGenerator};
    use funnel_legacy::derive_legacy_payload_from_document;

    #[test]
    fn test_snapshot_wire_format() {
        let mut ids = IdGenerator::from_seed("snap");
        let doc = default_document(&mut ids);
        let legacy = derive_legacy_payload_from_document(&doc).unwrap();
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

        let snapshot =
            create_published_snapshot_at(&doc.pages, doc.active_page_id.as_deref(), legacy, at);
        let value = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(value["version"], serde_json::json!(DOCUMENT_VERSION));
        assert_eq!(value["publishedAt"], serde_json::json!("2024-03-01T12:00:00Z"));
        assert_eq!(value["activePageId"], serde_json::json!(doc.pages[0].id));
        assert!(value["legacy"].is_array());

        let parsed: PublishedDocumentSnapshot = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, snapshot);
    }

    #[test]
    fn test_snapshot_copies_pages() {
        let mut ids = IdGenerator::from_seed("snap");
        let mut doc = default_document(&mut ids);
        let legacy = derive_legacy_payload_from_document(&doc).unwrap();

        let snapshot = create_published_snapshot(&doc.pages, None, legacy);
        doc.pages[0].name = "Renamed after publish".to_string();

        assert_ne!(snapshot.pages()[0].name, doc.pages[0].name);
    }
}
