//! Upstream Network
//!
//! The worker reaches the job board origin through the [`Network`] trait.
//! [`HttpNetwork`] forwards requests with reqwest.

use std::time::Duration;

use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use tracing::debug;
use url::Url;

use crate::error::{AppError, Result};
use crate::worker::{WorkerRequest, WorkerResponse};

/// Something that can answer a request over the network.
///
/// An `Err` means no response was obtained at all. Non-2xx responses are
/// returned as `Ok` and left to the caller to judge.
#[async_trait]
pub trait Network: Send + Sync {
    async fn fetch(&self, request: &WorkerRequest) -> Result<WorkerResponse>;
}

// == HTTP Network ==
/// Forwards requests to a fixed upstream origin, keeping path and query.
#[derive(Debug, Clone)]
pub struct HttpNetwork {
    client: reqwest::Client,
    upstream: Url,
}

impl HttpNetwork {
    pub fn new(upstream: &str, timeout: Duration) -> Result<Self> {
        let upstream = Url::parse(upstream)
            .map_err(|e| AppError::InvalidRequest(format!("invalid upstream url '{upstream}': {e}")))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("failed to build http client: {e}")))?;

        Ok(Self { client, upstream })
    }

    /// Upstream URL for `request`.
    pub fn target(&self, request: &WorkerRequest) -> Url {
        let mut target = self.upstream.clone();
        target.set_path(request.url.path());
        target.set_query(request.url.query());
        target
    }
}

#[async_trait]
impl Network for HttpNetwork {
    async fn fetch(&self, request: &WorkerRequest) -> Result<WorkerResponse> {
        let target = self.target(request);
        debug!(method = %request.method, %target, "forwarding upstream");

        let response = self
            .client
            .request(request.method.clone(), target)
            .headers(forwardable(&request.headers))
            .body(request.body.clone())
            .send()
            .await?;

        let status = response.status();
        let headers = forwardable(response.headers());
        let body = response.bytes().await?;

        Ok(WorkerResponse::new(status, headers, body))
    }
}

/// Drops hop-by-hop and host headers before a message crosses the proxy.
fn forwardable(headers: &HeaderMap) -> HeaderMap {
    let mut out = headers.clone();
    for name in [
        header::HOST,
        header::CONNECTION,
        header::TRANSFER_ENCODING,
        header::CONTENT_LENGTH,
        header::TE,
        header::TRAILER,
        header::UPGRADE,
        header::PROXY_AUTHORIZATION,
        header::PROXY_AUTHENTICATE,
    ] {
        out.remove(name);
    }
    out.remove("keep-alive");
    out
}
