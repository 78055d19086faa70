//! Worker Request/Response Types
//!
//! Owned request and response values passed between the proxy, the worker
//! handlers, the partition store and the upstream network.

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::Value;
use url::Url;

use crate::error::{AppError, Result};

/// Header set on responses answered from a cache partition after the
/// network failed.
pub const CACHE_HIT_HEADER: &str = "x-sw-cache";

// == Request Mode ==
/// How the browser issued the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    /// Top-level page load
    Navigate,
    /// Subresource or script-initiated fetch
    Cors,
}

// == Worker Request ==
#[derive(Debug, Clone)]
pub struct WorkerRequest {
    pub method: Method,
    /// Absolute URL; partitions are keyed by its string form
    pub url: Url,
    pub mode: RequestMode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl WorkerRequest {
    /// Builds a request with an empty body.
    pub fn new(method: Method, url: Url, mode: RequestMode) -> Self {
        Self {
            method,
            url,
            mode,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// Parses `url` into a plain GET request.
    pub fn get(url: &str) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|e| AppError::InvalidRequest(format!("invalid url '{url}': {e}")))?;
        Ok(Self::new(Method::GET, url, RequestMode::Cors))
    }

    /// Parses `url` into a page navigation.
    pub fn navigate(url: &str) -> Result<Self> {
        let mut request = Self::get(url)?;
        request.mode = RequestMode::Navigate;
        Ok(request)
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// Whether the scheme is one the worker intercepts.
    pub fn is_http(&self) -> bool {
        matches!(self.url.scheme(), "http" | "https")
    }

    /// Key used in cache partitions.
    pub fn cache_key(&self) -> &str {
        self.url.as_str()
    }
}

// == Worker Response ==
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl WorkerResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Response with the given content type.
    pub fn with_content_type(status: StatusCode, content_type: &'static str, body: impl Into<Bytes>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        Self::new(status, headers, body)
    }

    pub fn text(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self::with_content_type(status, "text/plain; charset=utf-8", body)
    }

    pub fn json(status: StatusCode, value: &Value) -> Self {
        Self::with_content_type(status, "application/json", value.to_string())
    }

    /// 2xx status.
    pub fn ok(&self) -> bool {
        self.status.is_success()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Marks the response as answered from a partition.
    pub fn mark_cache_hit(mut self) -> Self {
        self.headers
            .insert(CACHE_HIT_HEADER, HeaderValue::from_static("hit"));
        self
    }

    pub fn is_cache_hit(&self) -> bool {
        self.header(CACHE_HIT_HEADER) == Some("hit")
    }

    /// Parses the body as JSON.
    pub fn json_body(&self) -> Result<Value> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

impl IntoResponse for WorkerResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}
