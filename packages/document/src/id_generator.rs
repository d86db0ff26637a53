use uuid::Uuid;

/// Generator for page and node ids.
///
/// Ids look like `<prefix>-<seed>-<n>`. The seed is random per generator so
/// two editing sessions never hand out the same id, and the counter keeps
/// ids within one session distinct.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        let uuid = Uuid::new_v4().simple().to_string();
        Self::from_seed(uuid[..8].to_string())
    }

    pub fn from_seed(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }

    /// Generate next sequential id
    pub fn new_id(&mut self, prefix: &str) -> String {
        self.count += 1;
        format!("{}-{}-{}", prefix, self.seed, self.count)
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids() {
        let mut ids = IdGenerator::from_seed("abc");

        assert_eq!(ids.new_id("page"), "page-abc-1");
        assert_eq!(ids.new_id("heading"), "heading-abc-2");
        assert_eq!(ids.new_id("page"), "page-abc-3");
    }

    #[test]
    fn test_random_seeds_differ() {
        let a = IdGenerator::new();
        let b = IdGenerator::new();

        assert_eq!(a.seed().len(), 8);
        assert_ne!(a.seed(), b.seed());
    }
}
