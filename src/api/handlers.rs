//! API Handlers
//!
//! HTTP request handlers for the worker control endpoints and the cached
//! job service endpoints.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use tracing::info;

use crate::cache::{shared, ApiCache};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{
    ClickResponse, HealthResponse, InvalidateResponse, ListQuery, PartitionInfo, StatsResponse,
    WorkerStatusResponse,
};
use crate::services::{JobSearchFilters, JobService, WorkerJobApi};
use crate::worker::{
    Network, Notification, NotificationClick, PushPayload, ServiceWorker, WorkerMessage,
    WorkerOptions,
};

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Offline worker answering proxied requests
    pub worker: Arc<ServiceWorker>,
    /// Cached job board reads
    pub jobs: JobService,
}

impl AppState {
    pub fn new(worker: Arc<ServiceWorker>, jobs: JobService) -> Self {
        Self { worker, jobs }
    }

    /// Builds the worker, the API cache and the job service from
    /// configuration. The service reaches the API through the worker.
    pub fn from_config(config: &Config, network: Arc<dyn Network>) -> Result<Self> {
        let origin = format!("http://localhost:{}", config.server_port);
        let options = WorkerOptions::from_config(config, &origin)?;
        let worker = Arc::new(ServiceWorker::new(options, network));

        let cache = shared(ApiCache::new(config.default_ttl_ms));
        let api = Arc::new(WorkerJobApi::new(worker.clone()));
        let jobs = JobService::new(api, cache);

        Ok(Self::new(worker, jobs))
    }
}

// == Worker control ==

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Handler for GET /__sw/status
pub async fn worker_status_handler(State(state): State<AppState>) -> Json<WorkerStatusResponse> {
    let worker = &state.worker;

    let mut partitions = Vec::new();
    for name in worker.storage().keys().await {
        let entries = worker.storage().entry_count(&name).await;
        partitions.push(PartitionInfo { name, entries });
    }

    Json(WorkerStatusResponse {
        state: worker.state().await,
        clients_claimed: worker.clients_claimed(),
        static_cache: worker.static_cache().to_string(),
        dynamic_cache: worker.dynamic_cache().to_string(),
        partitions,
    })
}

/// Handler for POST /__sw/message
///
/// Applies the message and answers 202 with no body.
pub async fn worker_message_handler(
    State(state): State<AppState>,
    Json(message): Json<WorkerMessage>,
) -> StatusCode {
    info!(?message, "worker message received");
    state.worker.handle_message(message).await;
    StatusCode::ACCEPTED
}

/// Handler for POST /__sw/push
pub async fn push_handler(body: Bytes) -> Json<Notification> {
    let payload = PushPayload::parse(Some(&body));
    Json(Notification::from_payload(payload))
}

/// Handler for POST /__sw/notificationclick
pub async fn notification_click_handler(Json(click): Json<NotificationClick>) -> Json<ClickResponse> {
    Json(ClickResponse {
        open_url: crate::worker::notification::click_target(&click),
    })
}

// == Cached job service ==

/// Handler for GET /svc/jobs/search
pub async fn search_jobs_handler(
    State(state): State<AppState>,
    Query(filters): Query<JobSearchFilters>,
) -> Result<Json<Value>> {
    Ok(Json(state.jobs.search_jobs(&filters).await?))
}

/// Handler for GET /svc/jobs/featured
pub async fn featured_jobs_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>> {
    if let Some(error_msg) = query.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }
    Ok(Json(state.jobs.featured_jobs(query.limit).await?))
}

/// Handler for GET /svc/jobs/recent
pub async fn recent_jobs_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>> {
    if let Some(error_msg) = query.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }
    Ok(Json(state.jobs.recent_jobs(query.limit).await?))
}

/// Handler for GET /svc/jobs/:id
pub async fn get_job_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    Ok(Json(state.jobs.get_job(&id).await?))
}

/// Handler for GET /svc/applications/candidate/:id
pub async fn candidate_applications_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    Ok(Json(state.jobs.candidate_applications(&id).await?))
}

/// Handler for GET /svc/users/:id/profile
pub async fn user_profile_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    Ok(Json(state.jobs.user_profile(&id).await?))
}

/// Handler for DELETE /svc/cache/jobs
pub async fn invalidate_jobs_handler(State(state): State<AppState>) -> Json<InvalidateResponse> {
    let removed = state.jobs.invalidate_jobs().await;
    Json(InvalidateResponse::new("jobs", removed))
}

/// Handler for GET /svc/cache/stats
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.jobs.stats().await))
}
