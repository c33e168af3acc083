//! Error types for checkin.
//!
//! This module defines all error types used throughout the checkin crate,
//! covering roster ingestion, QR rendering, the request handler, and object
//! storage.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for checkin operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Roster Errors ===
    /// Failed to open or parse the roster file.
    #[error("failed to read roster {path}: {source}")]
    RosterRead {
        /// Path to the roster file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: csv::Error,
    },

    /// The roster could not be parsed as CSV.
    #[error("roster parse failed: {0}")]
    RosterParse(#[from] csv::Error),

    /// A roster row is missing a required column.
    #[error("roster is missing column '{column}'")]
    MissingColumn {
        /// Header name of the missing column.
        column: &'static str,
    },

    /// A registrant's identity yields an empty file name.
    #[error("registrant '{identity}' has no usable characters for a file name")]
    EmptySlug {
        /// The `first_last_company` identity the slug was derived from.
        identity: String,
    },

    // === Rendering Errors ===
    /// The payload could not be encoded as a QR code.
    #[error("QR encoding failed: {0}")]
    QrEncode(#[from] qrcode::types::QrError),

    /// A view failed to render.
    #[error("template rendering failed: {0}")]
    TemplateRender(#[from] askama::Error),

    /// A template file could not be loaded.
    #[error("failed to load template {path}: {source}")]
    TemplateLoad {
        /// Path to the template file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Handler Errors ===
    /// The event is not valid JSON or has the wrong shape.
    #[error("invalid event: {0}")]
    InvalidEvent(#[source] serde_json::Error),

    /// The event carried no query string parameters.
    #[error("event has no queryStringParameters")]
    MissingQueryString,

    /// A required query parameter is absent.
    #[error("missing required parameter '{name}'")]
    MissingParameter {
        /// Name of the parameter.
        name: &'static str,
    },

    // === Storage Errors ===
    /// The object key would escape the storage root.
    #[error("invalid object key '{key}'")]
    InvalidObjectKey {
        /// The rejected key.
        key: String,
    },

    /// Writing an object failed.
    #[error("failed to store object '{key}' in {backend}: {message}")]
    StorageWrite {
        /// Backend tag of the store.
        backend: &'static str,
        /// The object key.
        key: String,
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write an output file.
    #[error("failed to write {path}: {source}")]
    FileWrite {
        /// Path that couldn't be written.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for checkin operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a configuration validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Create a storage write error.
    #[must_use]
    pub fn storage_write(
        backend: &'static str,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::StorageWrite {
            backend,
            key: key.into(),
            message: message.into(),
        }
    }

    /// Check if this error is caused by a missing or malformed request
    /// parameter.
    #[must_use]
    pub fn is_missing_parameter(&self) -> bool {
        matches!(
            self,
            Self::MissingParameter { .. } | Self::MissingQueryString | Self::InvalidEvent(_)
        )
    }

    /// Check if this error comes from the object store.
    #[must_use]
    pub fn is_storage_error(&self) -> bool {
        matches!(
            self,
            Self::StorageWrite { .. } | Self::InvalidObjectKey { .. }
        )
    }
}
