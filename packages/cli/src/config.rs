use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use wireframe_editor::SessionConfig;

pub const DEFAULT_CONFIG_NAME: &str = "wireframe.config.json";

/// Wireframe configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Layout document used when a command is given no path
    #[serde(default = "default_layout")]
    pub layout: String,

    /// Options for the edit session commands run in
    #[serde(default)]
    pub session: SessionConfig,
}

fn default_layout() -> String {
    "layout.json".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Absolute path to `path`, or to the configured layout
    pub fn layout_path(&self, cwd: &str, path: Option<&str>) -> PathBuf {
        PathBuf::from(cwd).join(path.unwrap_or(&self.layout))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout: default_layout(),
            session: SessionConfig::default(),
        }
    }
}
