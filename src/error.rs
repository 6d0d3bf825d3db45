// Error types shared by the library and both binaries

use std::path::PathBuf;
use thiserror::Error;

/// Why a record load did not produce a store
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed record payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("load was abandoned before it finished")]
    Abandoned,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got '{value}'")]
    Invalid {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}
