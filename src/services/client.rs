//! Job board REST client
//!
//! [`JobApi`] is the seam between the cached service and the upstream REST
//! API. [`WorkerJobApi`] sends every call through the offline worker so the
//! worker's partitions and the API cache fill independently.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{header, HeaderValue, Method};
use serde_json::Value;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::worker::{RequestMode, ServiceWorker, WorkerRequest, WorkerResponse};

#[async_trait]
pub trait JobApi: Send + Sync {
    /// GET `path_and_query`, decoded as JSON.
    async fn get_json(&self, path_and_query: &str) -> Result<Value>;

    /// Sends `body` with `method` to `path`, returning the decoded JSON
    /// reply (`Null` for an empty body).
    async fn send_json(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value>;
}

// == Worker-backed client ==
#[derive(Debug, Clone)]
pub struct WorkerJobApi {
    worker: Arc<ServiceWorker>,
}

impl WorkerJobApi {
    pub fn new(worker: Arc<ServiceWorker>) -> Self {
        Self { worker }
    }

    fn request(&self, method: Method, path_and_query: &str) -> Result<WorkerRequest> {
        let url = self.worker.origin().join(path_and_query).map_err(|e| {
            AppError::InvalidRequest(format!("invalid api path '{path_and_query}': {e}"))
        })?;
        Ok(WorkerRequest::new(method, url, RequestMode::Cors)
            .with_header(header::ACCEPT, HeaderValue::from_static("application/json")))
    }

    async fn execute(&self, request: WorkerRequest) -> Result<Value> {
        let url = request.url.to_string();
        debug!(method = %request.method, %url, "job api call");
        let response = self.worker.handle_fetch(request).await?;
        decode(response, url)
    }
}

#[async_trait]
impl JobApi for WorkerJobApi {
    async fn get_json(&self, path_and_query: &str) -> Result<Value> {
        let request = self.request(Method::GET, path_and_query)?;
        self.execute(request).await
    }

    async fn send_json(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let mut request = self.request(method, path)?;
        if let Some(body) = body {
            request = request
                .with_header(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .with_body(body.to_string());
        }
        self.execute(request).await
    }
}

/// Maps a worker response to JSON or an error. The worker's synthetic
/// offline reply becomes [`AppError::Offline`].
fn decode(response: WorkerResponse, url: String) -> Result<Value> {
    if !response.ok() {
        if let Ok(body) = response.json_body() {
            if body.get("offline").and_then(Value::as_bool) == Some(true) {
                let message = body
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("network unavailable");
                return Err(AppError::Offline(message.to_string()));
            }
        }
        return Err(AppError::UpstreamStatus {
            status: response.status.as_u16(),
            url,
        });
    }

    if response.body.is_empty() {
        return Ok(Value::Null);
    }
    response.json_body()
}
