use crate::history::DEFAULT_HISTORY_DEPTH;
use serde::{Deserialize, Serialize};

/// Edit session options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// Maximum number of undo levels; 0 is treated as 1
    #[serde(default = "default_history_depth")]
    pub history_depth: usize,

    /// Prefix for generated node ids; derived from the clock when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_seed: Option<String>,

    /// Push a snapshot of the initial state when the session starts
    #[serde(default = "default_seed_history")]
    pub seed_history: bool,
}

fn default_history_depth() -> usize {
    DEFAULT_HISTORY_DEPTH
}

fn default_seed_history() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_depth: default_history_depth(),
            id_seed: None,
            seed_history: default_seed_history(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{ "historyDepth": 10, "idSeed": "doc", "seedHistory": false }"#;

        let config: SessionConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.history_depth, 10);
        assert_eq!(config.id_seed.as_deref(), Some("doc"));
        assert!(!config.seed_history);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: SessionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.history_depth, 64);
        assert!(config.seed_history);
    }
}
