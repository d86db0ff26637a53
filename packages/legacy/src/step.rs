use crate::LegacyError;
use funnel_document::PageType;
use serde::{Deserialize, Serialize};

/// One step of a flat, pre-tree funnel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyStep {
    pub id: String,

    #[serde(default)]
    pub order_index: u32,

    /// Stored spelling, aliases included; see [`LegacyStep::page_type`]
    pub step_type: String,

    #[serde(default)]
    pub content: LegacyContent,
}

impl LegacyStep {
    /// Classify `step_type` with the page type vocabulary
    pub fn page_type(&self) -> PageType {
        PageType::from(self.step_type.as_str())
    }
}

/// The content fields the flat format defines
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subheadline: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,

    #[serde(default)]
    pub options: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_label: Option<String>,
}

/// Ordered step list embedded in every published snapshot.
///
/// Never empty when produced by the forward adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LegacySnapshotPayload {
    steps: Vec<LegacyStep>,
}

impl LegacySnapshotPayload {
    pub fn new(steps: Vec<LegacyStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[LegacyStep] {
        &self.steps
    }

    pub fn into_steps(self) -> Vec<LegacyStep> {
        self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Parse legacy steps from either a bare array or `{"steps": [...]}`
pub fn parse_legacy_steps(json: &str) -> Result<Vec<LegacyStep>, LegacyError> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Bare(Vec<LegacyStep>),
        Wrapped { steps: Vec<LegacyStep> },
    }

    Ok(match serde_json::from_str(json)? {
        Wire::Bare(steps) | Wire::Wrapped { steps } => steps,
    })
}
