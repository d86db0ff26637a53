//! # Pages and Documents
//!
//! A funnel is an ordered list of [`Page`]s; the order is the step order an
//! end user walks through. [`EditorDocument`] is the draft unit of work that
//! gets saved and hydrated.

use crate::visitor::{IdCollector, Visitor};
use crate::{DocumentError, Node};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Schema version written into every document
pub const DOCUMENT_VERSION: u32 = 1;

/// Advisory page classification.
///
/// Used by the legacy adapter only; it does not constrain the tree. Values
/// outside the known vocabulary are kept as [`PageType::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PageType {
    Welcome,
    Question,
    Booking,
    ThankYou,
    Custom(String),
}

impl PageType {
    pub fn as_str(&self) -> &str {
        match self {
            PageType::Welcome => "welcome",
            PageType::Question => "question",
            PageType::Booking => "booking",
            PageType::ThankYou => "thank_you",
            PageType::Custom(value) => value.as_str(),
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, PageType::Custom(_))
    }
}

impl From<String> for PageType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "welcome" | "landing" => PageType::Welcome,
            "question" | "capture" => PageType::Question,
            "booking" | "appointment" => PageType::Booking,
            "thank_you" | "thank-you" | "thankyou" => PageType::ThankYou,
            _ => PageType::Custom(value),
        }
    }
}

impl From<&str> for PageType {
    fn from(value: &str) -> Self {
        PageType::from(value.to_string())
    }
}

impl From<PageType> for String {
    fn from(value: PageType) -> Self {
        match value {
            PageType::Custom(value) => value,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a page came from when it was hydrated from a flat legacy step.
///
/// Kept so the forward adapter can write the step back exactly as it was
/// stored: same `order_index`, same `step_type` spelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyOrigin {
    pub order_index: u32,
    pub step_type: String,
}

/// One step of a funnel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub page_type: PageType,
    pub canvas_root: Node,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_origin: Option<LegacyOrigin>,
}

impl Page {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        page_type: PageType,
        canvas_root: Node,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            page_type,
            canvas_root,
            legacy_origin: None,
        }
    }

    pub fn find_node(&self, node_id: &str) -> Option<&Node> {
        self.canvas_root.find(node_id)
    }

    pub fn contains_node(&self, node_id: &str) -> bool {
        self.canvas_root.contains(node_id)
    }
}

/// Draft document persisted on save
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorDocument {
    pub version: u32,

    #[serde(default)]
    pub pages: Vec<Page>,

    #[serde(default)]
    pub active_page_id: Option<String>,
}

impl EditorDocument {
    /// Document over `pages` with the first page active
    pub fn new(pages: Vec<Page>) -> Self {
        let active_page_id = pages.first().map(|p| p.id.clone());
        Self {
            version: DOCUMENT_VERSION,
            pages,
            active_page_id,
        }
    }

    pub fn page(&self, page_id: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == page_id)
    }

    pub fn active_page(&self) -> Option<&Page> {
        self.active_page_id
            .as_deref()
            .and_then(|id| self.page(id))
    }

    /// Every node id across all pages
    pub fn node_ids(&self) -> Vec<String> {
        let mut collector = IdCollector::default();
        collector.visit_document(self);
        collector.node_ids
    }

    /// Check structural invariants: unique ids and a valid active page
    pub fn validate(&self) -> Result<(), DocumentError> {
        let mut page_ids = HashSet::new();
        for page in &self.pages {
            if !page_ids.insert(page.id.as_str()) {
                return Err(DocumentError::DuplicateId(page.id.clone()));
            }
        }

        let mut collector = IdCollector::default();
        collector.visit_document(self);
        if let Some(duplicate) = collector.duplicates().into_iter().next() {
            return Err(DocumentError::DuplicateId(duplicate));
        }

        match &self.active_page_id {
            Some(id) if self.page(id).is_none() => {
                Err(DocumentError::DanglingActivePage(id.clone()))
            }
            None if !self.pages.is_empty() => Err(DocumentError::MissingActivePage),
            _ => Ok(()),
        }
    }
}
