//! S3-compatible object store over plain HTTP.
//!
//! Objects are written with `PUT {endpoint}/{bucket}/{key}`. This works
//! against path-style S3 endpoints that accept bearer tokens or anonymous
//! writes, such as a `MinIO` bucket with an upload policy or a signing proxy.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tracing::{debug, instrument};

use super::ObjectStore;
use crate::error::{Error, Result};

/// Writes objects to an S3-compatible endpoint.
#[derive(Debug, Clone)]
pub struct HttpObjectStore {
    endpoint: String,
    bucket: String,
    bearer_token: Option<String>,
    client: reqwest::Client,
}

impl HttpObjectStore {
    /// Create a store for `bucket` at `endpoint`.
    #[must_use]
    pub fn new(endpoint: String, bucket: String, bearer_token: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            bucket: bucket.trim_matches('/').to_string(),
            bearer_token: bearer_token.filter(|t| !t.is_empty()),
            client,
        }
    }

    /// URL an object is written to.
    #[must_use]
    pub fn object_url(&self, key: &str) -> String {
        let encoded: Vec<String> = key
            .split('/')
            .map(|segment| url::form_urlencoded::byte_serialize(segment.as_bytes()).collect())
            .map(|segment: String| segment.replace('+', "%20"))
            .collect();
        format!("{}/{}/{}", self.endpoint, self.bucket, encoded.join("/"))
    }

    fn headers(&self, key: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = &self.bearer_token {
            let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
                Error::storage_write(self.backend_tag(), key, format!("invalid auth header: {e}"))
            })?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    fn backend_tag(&self) -> &'static str {
        "http"
    }

    #[instrument(name = "store_http_put", skip(self, body), fields(bytes = body.len()))]
    async fn put_object(&self, key: &str, body: Vec<u8>) -> Result<()> {
        let url = self.object_url(key);
        let headers = self.headers(key)?;
        debug!("PUT {}", url);

        let response = self
            .client
            .put(&url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(|e| Error::storage_write(self.backend_tag(), key, e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Error::storage_write(
                self.backend_tag(),
                key,
                format!("unexpected status {status}"),
            ))
        }
    }
}
