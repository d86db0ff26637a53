use crate::StorageError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage key of one funnel.
///
/// Restricted to ASCII letters, digits, `-` and `_` so it is always safe
/// to use as a path component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FunnelId(String);

impl FunnelId {
    pub fn new(id: impl Into<String>) -> Result<Self, StorageError> {
        let id = id.into();
        let valid = !id.is_empty()
            && id.len() <= 128
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if !valid {
            return Err(StorageError::InvalidFunnelId(id));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FunnelId {
    type Error = StorageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FunnelId> for String {
    fn from(value: FunnelId) -> Self {
        value.0
    }
}

impl fmt::Display for FunnelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Funnel lifecycle. There is no way back to `Draft`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunnelStatus {
    #[default]
    Draft,
    Published,
}

impl fmt::Display for FunnelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunnelStatus::Draft => f.write_str("draft"),
            FunnelStatus::Published => f.write_str("published"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_funnel_id_validation() {
        assert!(FunnelId::new("spring-promo_2").is_ok());
        assert!(FunnelId::new("").is_err());
        assert!(FunnelId::new("../etc").is_err());
        assert!(FunnelId::new("a/b").is_err());
    }

    #[test]
    fn test_funnel_id_deserialization_validates() {
        let ok: FunnelId = serde_json::from_str("\"promo\"").unwrap();
        assert_eq!(ok.as_str(), "promo");
        assert!(serde_json::from_str::<FunnelId>("\"no spaces\"").is_err());
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&FunnelStatus::Published).unwrap(),
            "\"published\""
        );
        assert_eq!(FunnelStatus::default(), FunnelStatus::Draft);
    }
}
