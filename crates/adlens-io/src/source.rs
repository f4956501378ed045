//! Upstream data sources.
//!
//! A [`DataSource`] performs the single read that produces the full
//! dataset. There is no pagination and no retry: a read either returns
//! every campaign or a [`FetchError`] describing why it could not.

use std::io::Read;
use std::path::{Path, PathBuf};

use adlens_pipeline::MarketingData;

/// Why a dataset could not be fetched.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The source could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bytes were read but are not a valid dataset.
    #[error("invalid marketing data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One-shot provider of the full dataset.
pub trait DataSource {
    /// Human-readable origin, used in log events.
    fn describe(&self) -> String;

    /// Read and decode the whole dataset.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the data cannot be read or decoded.
    fn fetch(&self) -> Result<MarketingData, FetchError>;
}

/// Decode a JSON document into a dataset.
///
/// # Errors
///
/// Returns [`FetchError::Parse`] for malformed JSON, missing campaign
/// totals, or negative counts.
pub fn parse_json(json: &str) -> Result<MarketingData, FetchError> {
    Ok(serde_json::from_str(json)?)
}

/// A JSON dataset file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DataSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<MarketingData, FetchError> {
        let json = std::fs::read_to_string(&self.path).map_err(|source| FetchError::Io {
            path: self.path.clone(),
            source,
        })?;
        parse_json(&json)
    }
}

/// A JSON dataset already held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonSource {
    json: String,
}

impl JsonSource {
    #[must_use]
    pub fn new(json: impl Into<String>) -> Self {
        Self { json: json.into() }
    }

    /// Drain `reader` (e.g. standard input) into a source.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Io`] if the reader fails.
    pub fn from_reader(mut reader: impl Read, origin: &str) -> Result<Self, FetchError> {
        let mut json = String::new();
        reader
            .read_to_string(&mut json)
            .map_err(|source| FetchError::Io {
                path: PathBuf::from(origin),
                source,
            })?;
        Ok(Self { json })
    }
}

impl DataSource for JsonSource {
    fn describe(&self) -> String {
        format!("in-memory JSON ({} bytes)", self.json.len())
    }

    fn fetch(&self) -> Result<MarketingData, FetchError> {
        parse_json(&self.json)
    }
}
