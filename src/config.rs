use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Checkpoint saver configuration, loadable from TOML.
///
/// Immutable for the lifetime of a [`crate::saver::CheckpointSaver`]; every
/// field has a default so partial TOML files work.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SaverConfig {
    /// Directory for the latest/ranked/best checkpoint files and the saver
    /// state record.
    pub checkpoint_dir: PathBuf,
    /// Directory for rotating crash-recovery checkpoint files.
    pub recovery_dir: PathBuf,
    /// Filename prefix for ranked checkpoints (`<prefix>-<epoch><ext>`).
    pub checkpoint_prefix: String,
    /// Filename prefix for recovery checkpoints (`<prefix>-<epoch>-<step><ext>`).
    pub recovery_prefix: String,
    /// File extension, including the leading dot.
    pub extension: String,
    /// Maximum number of ranked checkpoints to keep. Must be >= 1.
    pub max_history: usize,
    /// When true, a lower metric is better.
    pub decreasing: bool,
    /// Restore saver state from a previous run's state record at construction.
    pub resume: bool,
}

impl Default for SaverConfig {
    fn default() -> Self {
        SaverConfig {
            checkpoint_dir: PathBuf::from("checkpoints"),
            recovery_dir: PathBuf::from("checkpoints"),
            checkpoint_prefix: "checkpoint".to_string(),
            recovery_prefix: "recovery".to_string(),
            extension: ".ckpt".to_string(),
            max_history: 10,
            decreasing: false,
            resume: false,
        }
    }
}

impl SaverConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: SaverConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_history < 1 {
            return Err(ConfigError::Validation(
                "max_history must be >= 1".into(),
            ));
        }
        if self.checkpoint_prefix.is_empty() {
            return Err(ConfigError::Validation(
                "checkpoint_prefix must not be empty".into(),
            ));
        }
        if self.recovery_prefix.is_empty() {
            return Err(ConfigError::Validation(
                "recovery_prefix must not be empty".into(),
            ));
        }
        if !self.extension.starts_with('.') {
            return Err(ConfigError::Validation(
                "extension must start with '.'".into(),
            ));
        }
        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&SaverConfig::default()).expect("default config serializes")
    }
}
