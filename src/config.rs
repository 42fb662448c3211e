use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Configuration for doxfill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where uploaded templates are stored
    pub templates_dir: PathBuf,

    /// Metadata cache location; `<templates_dir>/_meta` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_dir: Option<PathBuf>,

    /// Default file name for generated documents
    pub output_filename: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            templates_dir: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("doxfill")
                .join("templates"),
            metadata_dir: None,
            output_filename: "generated.docx".to_string(),
        }
    }
}

impl Config {
    /// Load config from the config directory
    pub fn load() -> Result<Self> {
        if let Some(config_path) = Self::get_config_path() {
            if config_path.exists() {
                let content = fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&content)?;
                log::debug!("Loaded config from {}", config_path.display());
                return Ok(config);
            }
        }

        // Return defaults if no config found
        Ok(Config::default())
    }

    /// Save config to the config directory
    pub fn save(&self) -> Result<Option<PathBuf>> {
        let Some(config_path) = Self::get_config_path() else {
            return Ok(None);
        };
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&config_path, content)?;
        Ok(Some(config_path))
    }

    /// Get the path to the config file
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("doxfill").join("config.toml"))
    }

    /// Initialize default config file
    pub fn init_default() -> Result<Option<PathBuf>> {
        Config::default().save()
    }

    pub fn metadata_dir(&self) -> PathBuf {
        self.metadata_dir
            .clone()
            .unwrap_or_else(|| self.templates_dir.join(crate::template::service::METADATA_DIR_NAME))
    }
}
