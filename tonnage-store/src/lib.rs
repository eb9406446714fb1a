//! Local record store keeping queried districts in a single JSON file.
//!
//! The file holds one table, `district`, keyed by community district code.
//! Deleting the file resets the store.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use tonnage_core::{
    model::{DistrictCode, DistrictRecord},
    ports::{RecordStore, Records, StoreError},
};

/// Default store file name, relative to the working directory.
pub const DEFAULT_STORE_PATH: &str = "tonnage.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    district: BTreeMap<DistrictCode, DistrictRecord>,
}

/// [`RecordStore`] backed by a JSON file.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store bound to `path`. Nothing is touched until the first call.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the store file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Read the table; a missing file is an empty table.
    fn load(&self) -> Result<StoreFile, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(StoreFile::default()),
            Err(error) => return Err(self.io_error(error)),
        };

        serde_json::from_reader(BufReader::new(file)).map_err(|error| StoreError::Corrupt {
            path: self.path.clone(),
            reason: error.to_string(),
        })
    }

    /// Write the table to a sibling file, then rename it over the store.
    fn save(&self, table: &StoreFile) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|error| self.io_error(error))?;
        }

        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        let staging = PathBuf::from(staging);

        let file = File::create(&staging).map_err(|error| self.io_error(error))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, table).map_err(|error| StoreError::Corrupt {
            path: staging.clone(),
            reason: error.to_string(),
        })?;
        writer.flush().map_err(|error| self.io_error(error))?;
        drop(writer);

        fs::rename(&staging, &self.path).map_err(|error| self.io_error(error))
    }
}

impl RecordStore for JsonFileStore {
    fn ensure_schema(&self) -> Result<(), StoreError> {
        if self.path.exists() {
            // Surface a corrupt file now rather than halfway through a run.
            self.load().map(drop)
        } else {
            info!("creating store {}", self.path.display());
            self.save(&StoreFile::default())
        }
    }

    fn upsert(&self, record: &DistrictRecord) -> Result<(), StoreError> {
        let mut table = self.load()?;
        let replaced = table
            .district
            .insert(record.community_district.clone(), record.clone())
            .is_some();
        debug!(
            "{} district {} in {}",
            if replaced { "updated" } else { "inserted" },
            record.community_district,
            self.path.display()
        );
        self.save(&table)
    }

    fn list_all(&self) -> Result<Records, StoreError> {
        let table = self.load()?;
        let records: Vec<_> = table.district.into_values().collect();
        Ok(records.into_iter())
    }
}
