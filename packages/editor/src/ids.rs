use crate::node::NodeId;
use std::time::{SystemTime, UNIX_EPOCH};

/// Seed derived from the wall clock, so ids from separate sessions differ
pub fn clock_seed() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("e{}", millis)
}

/// Sequential ID generator for layout nodes within a session
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::from_seed(clock_seed())
    }

    pub fn from_seed(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }

    /// Generate next sequential ID
    pub fn new_id(&mut self) -> NodeId {
        self.count += 1;
        NodeId::new(format!("{}-{}", self.seed, self.count))
    }

    /// Next ID for which `taken` is false.
    ///
    /// Imported trees may already hold ids from this seed.
    pub fn fresh_id(&mut self, mut taken: impl FnMut(&NodeId) -> bool) -> NodeId {
        loop {
            let id = self.new_id();
            if !taken(&id) {
                return id;
            }
        }
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
        let mut gen = IdGenerator::from_seed("e42");

        let id1 = gen.new_id();
        let id2 = gen.new_id();

        assert_eq!(id1, "e42-1");
        assert_eq!(id2, "e42-2");
        assert!(id1.as_str().starts_with(gen.seed()));
    }

    #[test]
    fn test_fresh_id_skips_taken() {
        let mut gen = IdGenerator::from_seed("s");
        let id = gen.fresh_id(|id| id == "s-1" || id == "s-2");
        assert_eq!(id, "s-3");
    }
}
