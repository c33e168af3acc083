//! Registrant roster loading.
//!
//! This module reads a CSV roster with a header row and removes duplicate
//! rows before any QR code is generated. Two rows are duplicates when every
//! column matches, not just the registrant columns.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::error::{Error, Result};
use crate::registrant::Registrant;

/// A de-duplicated roster.
#[derive(Debug, Clone)]
pub struct Roster {
    headers: StringRecord,
    rows: Vec<StringRecord>,
    total_rows: usize,
}

impl Roster {
    /// Load a roster from a CSV file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or is not valid CSV.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Reading roster from {}", path.display());
        let reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::Headers)
            .from_path(path)
            .map_err(|source| Error::RosterRead {
                path: path.to_path_buf(),
                source,
            })?;
        Self::collect(reader)
    }

    /// Load a roster from any CSV reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not valid CSV.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::Headers)
            .from_reader(reader);
        Self::collect(reader)
    }

    fn collect<R: Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let headers = reader.headers()?.clone();
        let mut seen = HashSet::new();
        let mut rows = Vec::new();
        let mut total_rows = 0;

        for record in reader.records() {
            let record = record?;
            total_rows += 1;
            if seen.insert(Self::row_hash(&record)) {
                rows.push(record);
            } else {
                debug!("Dropping duplicate roster row {}", total_rows);
            }
        }

        Ok(Self {
            headers,
            rows,
            total_rows,
        })
    }

    /// BLAKE3 hash over every field of a record.
    ///
    /// Each field is length-prefixed so `["ab", "c"]` and `["a", "bc"]` differ.
    #[must_use]
    pub fn row_hash(record: &StringRecord) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        for field in record {
            hasher.update(&(field.len() as u64).to_le_bytes());
            hasher.update(field.as_bytes());
        }
        hasher.finalize()
    }

    /// The header row.
    #[must_use]
    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    /// Number of data rows read, duplicates included.
    #[must_use]
    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    /// Number of unique rows kept.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the roster has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows dropped as duplicates.
    #[must_use]
    pub fn dropped_duplicates(&self) -> usize {
        self.total_rows - self.rows.len()
    }

    /// Registrants for each unique row, with the row's index.
    ///
    /// A row that cannot be turned into a registrant yields an error in place
    /// so the caller can skip it and continue.
    pub fn registrants(&self) -> impl Iterator<Item = (usize, Result<Registrant>)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .map(|(idx, record)| (idx, Registrant::from_record(&self.headers, record)))
    }
}
