// 📥 Record Load - the single fetch of the review batch
//
// A load either yields a RecordStore or a LoadError; callers decide how to
// surface the failure. Records are stored exactly as received.

use crate::dataset;
use crate::error::LoadError;
use crate::store::{DataPayload, RecordStore};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::thread;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Embedded sample batch
    Builtin,
    /// JSON document on disk
    File(PathBuf),
    /// Endpoint answering `GET` with `{ "records": [...] }`
    Http(String),
}

impl DataSource {
    /// `builtin`, an `http(s)://` URL, or anything else as a file path
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == "builtin" {
            DataSource::Builtin
        } else if value.starts_with("http://") || value.starts_with("https://") {
            DataSource::Http(value.to_string())
        } else {
            DataSource::File(PathBuf::from(value))
        }
    }

    /// Blocking load. Must not be called from inside an async runtime.
    pub fn load(&self) -> Result<RecordStore, LoadError> {
        tracing::debug!(source = %self, "Loading records");

        let result = match self {
            DataSource::Builtin => dataset::builtin(),
            DataSource::File(path) => load_file(path),
            DataSource::Http(url) => fetch(url),
        };

        match &result {
            Ok(store) => tracing::info!(source = %self, records = store.len(), "Records loaded"),
            Err(e) => tracing::error!(source = %self, error = %e, "Record load failed"),
        }

        result
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Builtin => f.write_str("builtin"),
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Http(url) => f.write_str(url),
        }
    }
}

pub fn parse_payload(body: &str) -> Result<RecordStore, LoadError> {
    let payload: DataPayload = serde_json::from_str(body)?;
    Ok(RecordStore::from_payload(payload))
}

fn load_file(path: &Path) -> Result<RecordStore, LoadError> {
    let body = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_payload(&body)
}

fn fetch(url: &str) -> Result<RecordStore, LoadError> {
    let transport = |source: reqwest::Error| LoadError::Transport {
        url: url.to_string(),
        source,
    };

    let response = reqwest::blocking::get(url).map_err(transport)?;

    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().map_err(transport)?;
    parse_payload(&body)
}

/// Run the load on a background thread.
///
/// The receiver yields exactly one result. If the receiver is dropped first
/// the result is discarded.
pub fn spawn_load(source: DataSource) -> Receiver<Result<RecordStore, LoadError>> {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let result = source.load();
        if tx.send(result).is_err() {
            tracing::debug!("Load finished after the receiver went away");
        }
    });

    rx
}
