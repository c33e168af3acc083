//! Configuration management for checkin.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::qr::ErrorCorrection;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "checkin";

/// Default roster file.
pub const DEFAULT_ROSTER_PATH: &str = "registrants.csv";

/// Default QR output directory.
pub const DEFAULT_QR_CODE_DIR: &str = "qr_codes";

/// Default handler URL embedded in QR codes.
pub const DEFAULT_LAMBDA_URL: &str = "http://127.0.0.1:3000/";

/// Default object key prefix for submissions.
pub const DEFAULT_SUBMISSION_PREFIX: &str = "participants";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables prefixed with `CHECKIN_`, nested with `__`
///    (e.g. `CHECKIN_STORAGE__BUCKET`)
/// 2. The `BUCKET` environment variable, mapped to `storage.bucket`
/// 3. TOML config file at `~/.config/checkin/config.toml`
/// 4. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// QR generator configuration.
    pub generator: GeneratorConfig,
    /// HTTP server configuration.
    pub server: ServerConfig,
    /// Submission storage configuration.
    pub storage: StorageConfig,
    /// HTML template configuration.
    pub templates: TemplateConfig,
}

/// QR generator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// CSV roster to read.
    pub file_path: PathBuf,
    /// Base URL of the check-in handler.
    pub lambda_url: String,
    /// Directory QR images are written to.
    pub qr_code_dir: PathBuf,
    /// QR error correction level.
    pub error_correction: ErrorCorrection,
    /// Minimum rendered width and height in pixels.
    pub min_dimension: u32,
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on.
    pub bind: String,
}

/// Which object store receives submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Files under a local directory.
    #[default]
    Local,
    /// An S3-compatible endpoint over HTTP.
    Http,
}

/// Submission storage configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend to use.
    pub backend: StorageBackend,
    /// Root directory for the local backend.
    pub root: PathBuf,
    /// Endpoint URL for the http backend.
    pub endpoint: Option<String>,
    /// Bucket name for the http backend.
    pub bucket: Option<String>,
    /// Bearer token sent with http backend requests.
    pub bearer_token: Option<String>,
    /// Key prefix for submission objects.
    pub prefix: String,
}

/// HTML template configuration.
///
/// Unset paths use the templates built into the binary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Scanner view template.
    pub scanner_path: Option<PathBuf>,
    /// Submit view template.
    pub submit_path: Option<PathBuf>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            file_path: PathBuf::from(DEFAULT_ROSTER_PATH),
            lambda_url: DEFAULT_LAMBDA_URL.to_string(),
            qr_code_dir: PathBuf::from(DEFAULT_QR_CODE_DIR),
            error_correction: ErrorCorrection::default(),
            min_dimension: 200,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Local,
            root: PathBuf::from("submissions"),
            endpoint: None,
            bucket: None,
            bearer_token: None,
            prefix: DEFAULT_SUBMISSION_PREFIX.to_string(),
        }
    }
}

impl Config {
    /// Load configuration with an optional custom config path.
    ///
    /// Values are not validated here: commands apply their flags first and
    /// then validate the sections they use.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::raw().only(&["BUCKET"]).map(|_| "storage.bucket".into()))
            .merge(Env::prefixed("CHECKIN_").split("__"));

        Ok(figment.extract()?)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate every section.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        self.validate_generator()?;
        self.validate_storage()
    }

    /// Validate the `[generator]` section.
    ///
    /// # Errors
    ///
    /// Returns an error for a `lambda_url` that is not an http(s) URL or a
    /// zero `min_dimension`.
    pub fn validate_generator(&self) -> Result<()> {
        let lambda_url = url::Url::parse(&self.generator.lambda_url).map_err(|e| {
            Error::config_validation(format!(
                "invalid lambda_url '{}': {e}",
                self.generator.lambda_url
            ))
        })?;
        if !matches!(lambda_url.scheme(), "http" | "https") {
            return Err(Error::config_validation(format!(
                "lambda_url must use http or https, got '{}'",
                lambda_url.scheme()
            )));
        }

        if self.generator.min_dimension == 0 {
            return Err(Error::config_validation(
                "min_dimension must be greater than 0",
            ));
        }
        Ok(())
    }

    /// Validate the `[storage]` section.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty or `..` prefix, or an http backend
    /// without a valid endpoint and bucket.
    pub fn validate_storage(&self) -> Result<()> {
        let prefix = self.storage.prefix.trim_matches('/');
        if prefix.is_empty() || prefix.split('/').any(|segment| segment == "..") {
            return Err(Error::config_validation(format!(
                "invalid storage prefix '{}'",
                self.storage.prefix
            )));
        }

        if self.storage.backend == StorageBackend::Http {
            let endpoint = self.storage.endpoint.as_deref().ok_or_else(|| {
                Error::config_validation("http storage backend requires an endpoint")
            })?;
            url::Url::parse(endpoint).map_err(|e| {
                Error::config_validation(format!("invalid storage endpoint '{endpoint}': {e}"))
            })?;
            if self.storage.bucket.as_deref().map_or(true, str::is_empty) {
                return Err(Error::config_validation(
                    "http storage backend requires a bucket",
                ));
            }
        }

        Ok(())
    }

    /// Storage key prefix without surrounding slashes.
    #[must_use]
    pub fn submission_prefix(&self) -> &str {
        self.storage.prefix.trim_matches('/')
    }
}
