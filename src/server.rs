//! The proxy server: one CORS-enabled route serving collapsed stacks
//!
//! speedscope.app fetches the profile from the browser, so the route must
//! answer cross-origin GETs with credentials. Everything else is a straight
//! pass-through: look up the samples, collapse them, send text.

use crate::clickhouse::TraceStore;
use crate::collapse::collapse;
use crate::config::ProxyConfig;
use crate::error::{Error, Result};
use axum::{
    extract::{Query, State},
    http::{header, Method, StatusCode},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

/// Shared route state
#[derive(Clone)]
struct AppState {
    store: Arc<dyn TraceStore>,
}

#[derive(Debug, Deserialize)]
struct StackQuery {
    query_id: Option<String>,
}

/// Bind the proxy and serve until shutdown
pub async fn serve(config: &ProxyConfig, store: Arc<dyn TraceStore>) -> Result<()> {
    let addr = config.bind_addr();
    let app = router(store);

    info!("Serving collapsed stacks on http://{addr}/query");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the proxy router
fn router(store: Arc<dyn TraceStore>) -> Router {
    // Credentials rule out a wildcard origin, so mirror whatever origin the
    // visualizer sends.
    let cors = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true)
        .allow_headers([header::ACCESS_CONTROL_ALLOW_ORIGIN])
        .expose_headers([header::ACCESS_CONTROL_ALLOW_ORIGIN])
        .max_age(Duration::from_secs(3600));

    Router::new()
        .route("/query", get(stacks))
        .layer(cors)
        .with_state(AppState { store })
}

/// `GET /query?query_id=<id>` → collapsed stacks as `text/plain`
async fn stacks(
    State(state): State<AppState>,
    Query(params): Query<StackQuery>,
) -> std::result::Result<String, (StatusCode, String)> {
    let query_id = match params.query_id.as_deref() {
        Some(id) if !id.is_empty() => id,
        _ => return Err((StatusCode::BAD_REQUEST, "Expected query id".to_string())),
    };

    match state.store.sample_stacks(query_id).await {
        Ok(samples) if samples.is_empty() => {
            Err((StatusCode::BAD_REQUEST, "Invalid query id".to_string()))
        }
        Ok(samples) => Ok(collapse(&samples)),
        Err(Error::ClickHouse(e)) => {
            warn!("ClickHouse rejected query id {query_id}: {e}");
            Err((StatusCode::BAD_REQUEST, "Invalid query id".to_string()))
        }
        Err(e) => {
            warn!("Failed to fetch samples for {query_id}: {e}");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to query ClickHouse".to_string(),
            ))
        }
    }
}
