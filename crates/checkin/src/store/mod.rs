//! Object storage for submissions.
//!
//! Submissions are written once under a key and never read back, so the
//! store interface is a single `put_object`. Backends:
//!
//! - [`LocalFsStore`]: files below a root directory.
//! - [`HttpObjectStore`]: `PUT` to an S3-compatible endpoint.
//! - [`MemoryStore`]: an in-process map for tests and dry runs.

mod http;
mod local;
mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{StorageBackend, StorageConfig};
use crate::error::{Error, Result};

pub use http::HttpObjectStore;
pub use local::LocalFsStore;
pub use memory::MemoryStore;

/// A write-only object store.
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug {
    /// Short name of the backend for logging.
    fn backend_tag(&self) -> &'static str;

    /// Store `body` under `key`, replacing any existing object.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is rejected or the write fails.
    async fn put_object(&self, key: &str, body: Vec<u8>) -> Result<()>;
}

/// Build the store selected by configuration.
///
/// # Errors
///
/// Returns an error if the http backend is selected without an endpoint or
/// bucket.
pub fn store_from_config(config: &StorageConfig) -> Result<Arc<dyn ObjectStore>> {
    match config.backend {
        StorageBackend::Local => Ok(Arc::new(LocalFsStore::new(config.root.clone()))),
        StorageBackend::Http => {
            let endpoint = config
                .endpoint
                .clone()
                .ok_or_else(|| Error::config_validation("http storage backend requires an endpoint"))?;
            let bucket = config
                .bucket
                .clone()
                .ok_or_else(|| Error::config_validation("http storage backend requires a bucket"))?;
            Ok(Arc::new(HttpObjectStore::new(
                endpoint,
                bucket,
                config.bearer_token.clone(),
            )))
        }
    }
}
