//! HTTP front end for the check-in handler.
//!
//! Each `GET /` request becomes an [`Event`] built from its query string, and
//! the handler's [`Response`] is mapped back onto HTTP.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::handler::{CheckinHandler, Event, Response};

/// Build the application router.
pub fn router(handler: Arc<CheckinHandler>) -> Router {
    Router::new()
        .route("/", get(checkin))
        .route("/health", get(|| async { "ok" }))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .with_state(handler)
}

async fn checkin(
    State(handler): State<Arc<CheckinHandler>>,
    Query(params): Query<BTreeMap<String, String>>,
) -> impl IntoResponse {
    let response = handler.handle(&Event::with_params(params)).await;
    into_http(response)
}

fn into_http(response: Response) -> axum::response::Response {
    let status =
        StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut http = (status, response.body).into_response();
    for (name, value) in &response.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                http.headers_mut().insert(name, value);
            }
            _ => warn!("Dropping invalid response header {}", name),
        }
    }
    http
}

/// Serve the handler on `bind` until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address is invalid or cannot be bound.
pub async fn serve(bind: &str, handler: CheckinHandler) -> Result<()> {
    let addr: SocketAddr = bind
        .parse()
        .map_err(|e| Error::config_validation(format!("invalid bind address '{bind}': {e}")))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound = listener.local_addr()?;
    info!(
        "Serving check-in on http://{} (storage backend: {})",
        bound,
        handler.store().backend_tag()
    );

    axum::serve(listener, router(Arc::new(handler)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
