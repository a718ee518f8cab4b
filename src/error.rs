use std::path::PathBuf;

/// Errors that can occur during checkpoint save and recovery operations.
///
/// Only the primary write path surfaces failures to the caller; cleanup of
/// evicted or superseded files degrades gracefully with a log line at the
/// call site and never appears here.
#[derive(Debug, thiserror::Error)]
pub enum SaverError {
    #[error("failed to serialize snapshot: {0}")]
    Serialize(String),

    #[error("failed to write snapshot to {path}: {source}")]
    SnapshotWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to publish latest snapshot at {path}: {source}")]
    Publish {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to link {src} to {dst}: {source}")]
    Link {
        src: PathBuf,
        dst: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write saver state to {path}: {source}")]
    StateWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read saver state from {path}: {source}")]
    StateRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse saver state from {path}: {source}")]
    StateParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
