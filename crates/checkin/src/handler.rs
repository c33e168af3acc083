//! The check-in request handler.
//!
//! One event in, one response out. A request without a `source` parameter is
//! a QR scan and gets the scanner view; a request with `source` is a form
//! submission, which is written to the object store before the submit view is
//! returned. Every failure becomes a 500 carrying the error text.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::config::{Config, DEFAULT_SUBMISSION_PREFIX};
use crate::error::{Error, Result};
use crate::registrant::Registrant;
use crate::store::{store_from_config, ObjectStore};
use crate::submission::Submission;
use crate::templates::Templates;

/// Query parameter that marks a form submission.
pub const SOURCE_PARAMETER: &str = "source";

/// An invocation event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Query string parameters, absent when the request had none.
    #[serde(rename = "queryStringParameters", default)]
    pub query_string_parameters: Option<BTreeMap<String, String>>,
}

impl Event {
    /// Event carrying the given parameters.
    #[must_use]
    pub fn with_params(params: BTreeMap<String, String>) -> Self {
        Self {
            query_string_parameters: Some(params),
        }
    }
}

/// An invocation response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// HTTP status code.
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    /// Response body.
    pub body: String,
    /// Response headers.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl Response {
    /// 200 with an HTML body.
    #[must_use]
    pub fn html(body: String) -> Self {
        Self {
            status_code: 200,
            body,
            headers: BTreeMap::from([("content-type".to_string(), "text/html".to_string())]),
        }
    }

    /// 500 with the error text as body.
    #[must_use]
    pub fn error(err: &Error) -> Self {
        Self {
            status_code: 500,
            body: err.to_string(),
            headers: BTreeMap::from([("content-type".to_string(), "text/plain".to_string())]),
        }
    }

    /// Check for a 2xx status.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Serves the scanner and submit views.
#[derive(Debug, Clone)]
pub struct CheckinHandler {
    templates: Templates,
    store: Arc<dyn ObjectStore>,
    prefix: String,
}

impl CheckinHandler {
    /// Create a handler writing submissions under the default prefix.
    #[must_use]
    pub fn new(templates: Templates, store: Arc<dyn ObjectStore>) -> Self {
        Self {
            templates,
            store,
            prefix: DEFAULT_SUBMISSION_PREFIX.to_string(),
        }
    }

    /// Build a handler from configuration: templates, storage backend, and
    /// key prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if a template cannot be loaded or the storage backend
    /// is misconfigured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let templates = Templates::load(&config.templates)?;
        let store = store_from_config(&config.storage)?;
        Ok(Self::new(templates, store).with_prefix(config.submission_prefix()))
    }

    /// Use a different key prefix for submissions.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// The store submissions are written to.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    /// Handle an event at the current time.
    pub async fn handle(&self, event: &Event) -> Response {
        self.handle_at(event, Utc::now()).await
    }

    /// Handle an event as if received at `now`.
    pub async fn handle_at(&self, event: &Event, now: DateTime<Utc>) -> Response {
        match self.dispatch(event, now).await {
            Ok(body) => Response::html(body),
            Err(e) => failure(&e),
        }
    }

    /// Handle a raw JSON event at the current time.
    ///
    /// An event that does not deserialize gets the same 500 response as any
    /// other failure.
    pub async fn handle_json(&self, raw: &str) -> Response {
        self.handle_json_at(raw, Utc::now()).await
    }

    /// Handle a raw JSON event as if received at `now`.
    pub async fn handle_json_at(&self, raw: &str, now: DateTime<Utc>) -> Response {
        match serde_json::from_str::<Event>(raw) {
            Ok(event) => self.handle_at(&event, now).await,
            Err(e) => failure(&Error::InvalidEvent(e)),
        }
    }

    async fn dispatch(&self, event: &Event, now: DateTime<Utc>) -> Result<String> {
        let params = event
            .query_string_parameters
            .as_ref()
            .ok_or(Error::MissingQueryString)?;
        let source = params.get(SOURCE_PARAMETER);
        info!("source={:?}", source);

        let registrant = Registrant::from_params(params)?;

        if source.is_some() {
            let body = self.templates.render_submit(params)?;
            self.record_submission(params, now).await?;
            Ok(body)
        } else {
            info!("Rendering scanner view for {}", registrant.identity());
            self.templates.render_scanner(&registrant)
        }
    }

    async fn record_submission(
        &self,
        params: &BTreeMap<String, String>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let submission = Submission::new(params.clone(), now);
        let key = submission.object_key(&self.prefix, now)?;
        let body = submission.to_json_bytes()?;
        info!(
            "Writing submission to {} backend, key={}",
            self.store.backend_tag(),
            key
        );
        self.store.put_object(&key, body).await
    }
}

fn failure(err: &Error) -> Response {
    error!("Check-in request failed: {}", err);
    Response::error(err)
}
