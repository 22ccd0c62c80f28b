use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize)]
pub struct DraftyConfig {
    /// Directory for saved document snapshots
    pub saves_dir: Option<PathBuf>,
    /// Seed the sample document at startup (default true)
    pub seed_document: Option<bool>,
}

impl DraftyConfig {
    pub fn from_file(path: &PathBuf) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: DraftyConfig =
            toml::from_str(&content).map_err(|e| format!("Invalid config format: {}", e))?;

        Ok(config)
    }
}

/// Fallback saves directory when neither the CLI nor the config names one.
pub fn default_saves_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("drafty")
        .join("saves")
}
