//! In-memory network used by the worker's unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use axum::http::StatusCode;

use crate::error::{AppError, Result};
use crate::worker::{Network, WorkerRequest, WorkerResponse};

/// Answers from a fixed path table; unknown paths get a 404. While offline
/// every fetch fails with a network error.
#[derive(Debug, Default)]
pub struct FakeNetwork {
    routes: Mutex<HashMap<String, WorkerResponse>>,
    offline: AtomicBool,
    calls: AtomicUsize,
}

impl FakeNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(self, path_and_query: &str, status: StatusCode, body: &'static str) -> Self {
        self.set_route(path_and_query, WorkerResponse::text(status, body));
        self
    }

    pub fn set_route(&self, path_and_query: &str, response: WorkerResponse) {
        self.routes
            .lock()
            .unwrap()
            .insert(path_and_query.to_string(), response);
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Network for FakeNetwork {
    async fn fetch(&self, request: &WorkerRequest) -> Result<WorkerResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(AppError::Network("connection refused".to_string()));
        }

        let key = match request.url.query() {
            Some(query) => format!("{}?{}", request.url.path(), query),
            None => request.url.path().to_string(),
        };
        Ok(self
            .routes
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| WorkerResponse::text(StatusCode::NOT_FOUND, "not found")))
    }
}
