//! Worker Proxy
//!
//! Fallback handler: any request not matched by an explicit route is turned
//! into a [`WorkerRequest`] and answered by the offline worker.

use axum::{
    body::to_bytes,
    extract::{Request, State},
    http::{header, HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
};
use tracing::debug;
use url::Url;

use super::handlers::AppState;
use crate::error::{AppError, Result};
use crate::worker::{RequestMode, WorkerRequest};

/// Largest request body forwarded upstream.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Handler for every unmatched route.
pub async fn proxy_handler(State(state): State<AppState>, request: Request) -> Response {
    let worker_request = match to_worker_request(&state, request).await {
        Ok(worker_request) => worker_request,
        Err(e) => return e.into_response(),
    };

    debug!(method = %worker_request.method, url = %worker_request.url, "proxying through worker");
    match state.worker.handle_fetch(worker_request).await {
        Ok(response) => response.into_response(),
        Err(e) => e.into_response(),
    }
}

async fn to_worker_request(state: &AppState, request: Request) -> Result<WorkerRequest> {
    let (parts, body) = request.into_parts();

    let url = request_url(state.worker.origin(), &parts.uri);

    let body = to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| AppError::InvalidRequest(format!("failed to read request body: {e}")))?;

    let mode = request_mode(&parts.method, &parts.headers);
    let mut worker_request = WorkerRequest::new(parts.method, url, mode).with_body(body);
    worker_request.headers = parts.headers;
    Ok(worker_request)
}

/// The request target on the worker's origin. Path and query are set
/// directly so a target like `//other.host/x` stays on the origin.
fn request_url(origin: &Url, uri: &Uri) -> Url {
    let mut url = origin.clone();
    url.set_path(uri.path());
    url.set_query(uri.query());
    url
}

/// A GET whose Accept header asks for HTML, or that the browser flags as a
/// navigation, is a page load.
fn request_mode(method: &Method, headers: &HeaderMap) -> RequestMode {
    if method != Method::GET {
        return RequestMode::Cors;
    }

    let flagged = headers
        .get("sec-fetch-mode")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("navigate"));
    let wants_html = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("text/html"));

    if flagged || wants_html {
        RequestMode::Navigate
    } else {
        RequestMode::Cors
    }
}
