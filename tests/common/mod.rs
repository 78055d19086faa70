//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{body::Body, http::StatusCode};
use jobboard_offline::error::{AppError, Result};
use jobboard_offline::worker::{Network, WorkerRequest, WorkerResponse};
use serde_json::Value;

/// Upstream stand-in answering from a path table. Unknown paths get a 404;
/// while offline every fetch fails like a refused connection.
#[derive(Debug, Default)]
pub struct StubNetwork {
    routes: Mutex<HashMap<String, WorkerResponse>>,
    offline: AtomicBool,
    calls: AtomicUsize,
}

impl StubNetwork {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn text(&self, path_and_query: &str, body: &'static str) {
        self.set(path_and_query, WorkerResponse::text(StatusCode::OK, body));
    }

    pub fn json(&self, path_and_query: &str, value: Value) {
        self.set(path_and_query, WorkerResponse::json(StatusCode::OK, &value));
    }

    pub fn set(&self, path_and_query: &str, response: WorkerResponse) {
        self.routes
            .lock()
            .unwrap()
            .insert(path_and_query.to_string(), response);
    }

    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    pub fn go_online(&self) {
        self.offline.store(false, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Network for StubNetwork {
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

pub async fn body_bytes(body: Body) -> Vec<u8> {
    axum::body::to_bytes(body, usize::MAX).await.unwrap().to_vec()
}

pub async fn body_to_json(body: Body) -> Value {
    serde_json::from_slice(&body_bytes(body).await).unwrap()
}
