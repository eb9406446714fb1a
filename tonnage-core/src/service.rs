//! High-level service facade combining the remote dataset and the local store.

use std::sync::Arc;

use log::{info, warn};

use crate::model::{DistrictRecord, QueryFilter};
use crate::ports::{QueryError, RecordStore, Records, StoreError, TonnageQueryPort};

#[derive(thiserror::Error, Debug)]
/// Errors surfaced by [`TonnageService`].
pub enum ServiceError {
    /// The remote query failed.
    #[error(transparent)]
    Query(#[from] QueryError),
    /// The local store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Public entry point for looking up and caching district tonnage.
pub struct TonnageService {
    remote: Arc<dyn TonnageQueryPort>,
    store: Arc<dyn RecordStore>,
}

impl TonnageService {
    /// Create a new service bound to the given remote dataset and store.
    #[must_use]
    pub fn new(remote: Arc<dyn TonnageQueryPort>, store: Arc<dyn RecordStore>) -> Self {
        Self { remote, store }
    }

    /// Make sure the store's table exists.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] if the store cannot be initialized.
    pub fn ensure_schema(&self) -> Result<(), ServiceError> {
        Ok(self.store.ensure_schema()?)
    }

    /// Query the dataset for one district and cache the row it returns.
    ///
    /// Returns `None` without touching the store when nothing matched.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] if the query fails, the row cannot be parsed,
    /// or the store cannot be written.
    pub async fn lookup(&self, filter: &QueryFilter) -> Result<Option<DistrictRecord>, ServiceError> {
        let rows = self.remote.query(filter).await?;
        if rows.len() > 1 {
            warn!(
                "{} rows matched {} district {}, using the first",
                rows.len(),
                filter.borough,
                filter.district
            );
        }

        let Some(row) = rows.into_iter().next() else {
            info!("no data for {} district {}", filter.borough, filter.district);
            return Ok(None);
        };

        let record = DistrictRecord::try_from(row)?;
        self.store.upsert(&record)?;
        info!("cached district {}", record.community_district);
        Ok(Some(record))
    }

    /// Read every cached district record.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] if the store cannot be read.
    pub fn records(&self) -> Result<Records, ServiceError> {
        Ok(self.store.list_all()?)
    }
}
