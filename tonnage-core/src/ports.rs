//! Traits describing the remote dataset and local store, plus their error types.

use std::num::ParseFloatError;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::model::{DistrictRecord, QueryFilter, RawRow};

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while querying the remote dataset.
pub enum QueryError {
    /// Network layer or HTTP status failure.
    #[error("Network error")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// A tonnage column did not hold a number.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseFloatError),
    /// A tonnage column held a negative or non-finite number.
    #[error("Invalid tonnage in `{column}`: {value}")]
    InvalidTonnage {
        /// Dataset column holding the value.
        column: &'static str,
        /// Value as received.
        value: String,
    },
    /// A row came back without one of its key columns.
    #[error("Malformed row: missing `{0}`")]
    MalformedRow(&'static str),
}

#[derive(thiserror::Error, Debug)]
/// Errors raised by the local record store.
pub enum StoreError {
    /// Reading or writing the store file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Store file involved.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// The store file exists but does not hold a readable table.
    #[error("Corrupt store {path}: {reason}")]
    Corrupt {
        /// Store file involved.
        path: PathBuf,
        /// Decoder message.
        reason: String,
    },
}

#[async_trait]
/// Read-only access to the remote tonnage dataset.
pub trait TonnageQueryPort: Send + Sync {
    /// Fetch every row matching the filter; an empty list means no data.
    ///
    /// # Errors
    ///
    /// Returns a [`QueryError`] when the request fails or the response cannot be decoded.
    async fn query(&self, filter: &QueryFilter) -> Result<Vec<RawRow>, QueryError>;
}

/// Owned, single-pass iterator over stored records.
pub type Records = std::vec::IntoIter<DistrictRecord>;

/// Single-table persistence keyed by community district.
pub trait RecordStore: Send + Sync {
    /// Create the empty table if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backing storage cannot be created.
    fn ensure_schema(&self) -> Result<(), StoreError>;

    /// Insert the record, replacing any record with the same district key.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backing storage cannot be read or written.
    fn upsert(&self, record: &DistrictRecord) -> Result<(), StoreError>;

    /// Read every stored record. Each call starts a fresh pass.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backing storage cannot be read.
    fn list_all(&self) -> Result<Records, StoreError>;
}
