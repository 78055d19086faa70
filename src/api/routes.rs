//! API Routes
//!
//! Configures the Axum router: worker control endpoints, the cached job
//! service and the worker proxy fallback.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_stats_handler, candidate_applications_handler, featured_jobs_handler, get_job_handler,
    health_handler, invalidate_jobs_handler, notification_click_handler, push_handler,
    recent_jobs_handler, search_jobs_handler, user_profile_handler, worker_message_handler,
    worker_status_handler, AppState,
};
use super::proxy::proxy_handler;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Health check endpoint
/// - `GET /__sw/status` - Worker state and partitions
/// - `POST /__sw/message` - Post a message to the worker
/// - `POST /__sw/push` - Deliver a push payload, returns the notification
/// - `POST /__sw/notificationclick` - Resolve a notification click
/// - `GET /svc/...` - Cached job board reads
/// - `DELETE /svc/cache/jobs` - Drop cached job reads
/// - `GET /svc/cache/stats` - API cache statistics
/// - anything else - answered by the worker
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/__sw/status", get(worker_status_handler))
        .route("/__sw/message", post(worker_message_handler))
        .route("/__sw/push", post(push_handler))
        .route("/__sw/notificationclick", post(notification_click_handler))
        .route("/svc/jobs/search", get(search_jobs_handler))
        .route("/svc/jobs/featured", get(featured_jobs_handler))
        .route("/svc/jobs/recent", get(recent_jobs_handler))
        .route("/svc/jobs/:id", get(get_job_handler))
        .route(
            "/svc/applications/candidate/:id",
            get(candidate_applications_handler),
        )
        .route("/svc/users/:id/profile", get(user_profile_handler))
        .route("/svc/cache/jobs", delete(invalidate_jobs_handler))
        .route("/svc/cache/stats", get(cache_stats_handler))
        .fallback(proxy_handler)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::worker::testing::FakeNetwork;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::util::ServiceExt;

    async fn create_test_app() -> Router {
        let network = Arc::new(FakeNetwork::new().route("/", StatusCode::OK, "home"));
        let config = Config {
            static_assets: vec!["/".to_string()],
            ..Config::default()
        };
        let state = AppState::from_config(&config, network).unwrap();
        state.worker.start().await.unwrap();
        create_router(state)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        let app = create_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/svc/cache/stats")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_message_endpoint_accepted() {
        let app = create_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/__sw/message")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"type":"SKIP_WAITING"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn test_fallback_goes_through_worker() {
        let app = create_test_app().await;

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_fallback_unknown_route_is_upstream_404() {
        let app = create_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/nonexistent")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
