//! Submission records written to object storage.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Format of `timestamp_utc`, e.g. `2024-05-01 13:45:12.123456`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// A submitted check-in.
///
/// Holds every query parameter of the submitting request plus the UTC time
/// it was received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// Request parameters, including the registrant fields and `source`.
    #[serde(flatten)]
    pub params: BTreeMap<String, String>,
    /// When the submission was received.
    pub timestamp_utc: String,
}

impl Submission {
    /// Create a submission stamped with `now`.
    #[must_use]
    pub fn new(params: BTreeMap<String, String>, now: DateTime<Utc>) -> Self {
        let mut params = params;
        // The stamp is authoritative even if a client sends its own.
        params.remove("timestamp_utc");
        Self {
            params,
            timestamp_utc: now.format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    /// Object key for this submission, partitioned by the hour of `now`.
    ///
    /// `<prefix>/yyyy=YYYY/mm=MM/dd=DD/hh=HH/<first>_<last>_<company>_<unix>.json`
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingParameter`] if a name part is absent.
    pub fn object_key(&self, prefix: &str, now: DateTime<Utc>) -> Result<String> {
        let part = |name: &'static str| -> Result<String> {
            self.params
                .get(name)
                .map(|v| key_segment(v))
                .ok_or(Error::MissingParameter { name })
        };

        let file_name = format!(
            "{}_{}_{}_{}.json",
            part("firstname")?,
            part("lastname")?,
            part("company")?,
            now.timestamp()
        );

        Ok(format!(
            "{}/yyyy={}/mm={:02}/dd={:02}/hh={:02}/{}",
            prefix.trim_matches('/'),
            now.year(),
            now.month(),
            now.day(),
            now.hour(),
            file_name
        ))
    }

    /// Pretty-printed JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }
}

/// Keep a value inside a single key segment.
fn key_segment(value: &str) -> String {
    value.replace(['/', '\\'], "-")
}
