//! Fetch interception
//!
//! Every intercepted request ends in a response: cached, fresh or synthetic.
//! The one exception is a non-jobs API call that fails with nothing cached,
//! which propagates the network error.

use axum::http::Method;
use tracing::{debug, warn};

use crate::error::Result;
use crate::worker::route::{classify, is_cacheable_api, is_jobs_api, RequestKind};
use crate::worker::{offline, ServiceWorker, WorkerRequest, WorkerResponse, WorkerState};

impl ServiceWorker {
    /// Answers `request`. Only GET requests on http(s) URLs reaching an
    /// activated worker are intercepted; everything else goes straight to
    /// the network.
    pub async fn handle_fetch(&self, request: WorkerRequest) -> Result<WorkerResponse> {
        if request.method != Method::GET
            || !request.is_http()
            || self.state().await != WorkerState::Activated
        {
            return self.network().fetch(&request).await;
        }

        let kind = classify(&request);
        debug!(url = %request.url, ?kind, "intercepted fetch");

        match kind {
            RequestKind::StaticAsset => Ok(self.cache_first_static(&request).await),
            RequestKind::Api => self.network_first_api(&request).await,
            RequestKind::Image => Ok(self.cache_first_image(&request).await),
            RequestKind::Navigation => Ok(self.network_first_navigation(&request).await),
            RequestKind::Other => Ok(self.network_with_cache_fallback(&request).await),
        }
    }

    async fn cache_first_static(&self, request: &WorkerRequest) -> WorkerResponse {
        if let Some(cached) = self.storage().match_in(self.static_cache(), request).await {
            return cached;
        }

        match self.network().fetch(request).await {
            Ok(response) => {
                if response.ok() {
                    self.storage()
                        .put(self.static_cache(), request, response.clone())
                        .await;
                }
                response
            }
            Err(e) => {
                warn!(url = %request.url, error = %e, "static asset unavailable");
                offline::asset_unavailable()
            }
        }
    }

    async fn network_first_api(&self, request: &WorkerRequest) -> Result<WorkerResponse> {
        let path = request.path();
        if !is_cacheable_api(path) {
            return self.network().fetch(request).await;
        }

        let failure = match self.network().fetch(request).await {
            Ok(response) if response.ok() => {
                self.storage()
                    .put(self.dynamic_cache(), request, response.clone())
                    .await;
                return Ok(response);
            }
            other => other,
        };

        if let Some(cached) = self.storage().match_any(request).await {
            debug!(url = %request.url, "api served from cache");
            return Ok(cached.mark_cache_hit());
        }

        match failure {
            // The upstream answered; its error status is the real reply
            Ok(response) => Ok(response),
            Err(_) if is_jobs_api(path) => {
                warn!(url = %request.url, "jobs api offline with no cached copy");
                Ok(offline::jobs_api_offline())
            }
            Err(e) => Err(e),
        }
    }

    async fn cache_first_image(&self, request: &WorkerRequest) -> WorkerResponse {
        if let Some(cached) = self.storage().match_any(request).await {
            return cached;
        }

        match self.network().fetch(request).await {
            Ok(response) if response.ok() => {
                self.storage()
                    .put(self.dynamic_cache(), request, response.clone())
                    .await;
                response
            }
            Ok(response) => {
                debug!(url = %request.url, status = %response.status, "image fetch not ok");
                offline::image_placeholder()
            }
            Err(e) => {
                debug!(url = %request.url, error = %e, "image fetch failed");
                offline::image_placeholder()
            }
        }
    }

    async fn network_first_navigation(&self, request: &WorkerRequest) -> WorkerResponse {
        match self.network().fetch(request).await {
            Ok(response) => {
                if response.ok() {
                    self.storage()
                        .put(self.dynamic_cache(), request, response.clone())
                        .await;
                }
                return response;
            }
            Err(e) => warn!(url = %request.url, error = %e, "navigation failed, trying cache"),
        }

        if let Some(cached) = self.storage().match_any(request).await {
            return cached;
        }

        if let Ok(root) = self.origin().join("/") {
            let root = WorkerRequest::new(Method::GET, root, request.mode);
            if let Some(cached) = self.storage().match_any(&root).await {
                return cached;
            }
        }

        offline::page_unavailable()
    }

    async fn network_with_cache_fallback(&self, request: &WorkerRequest) -> WorkerResponse {
        match self.network().fetch(request).await {
            Ok(response) => response,
            Err(e) => {
                debug!(url = %request.url, error = %e, "fetch failed, trying cache");
                match self.storage().match_any(request).await {
                    Some(cached) => cached,
                    None => offline::unavailable(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::worker::testing::FakeNetwork;
    use crate::worker::WorkerOptions;
    use axum::http::StatusCode;
    use serde_json::json;
    use std::sync::Arc;

    const ORIGIN: &str = "http://localhost:3000";

    async fn active_worker(network: Arc<FakeNetwork>) -> ServiceWorker {
        let options = WorkerOptions {
            static_assets: vec![],
            ..WorkerOptions::default()
        };
        let sw = ServiceWorker::new(options, network);
        sw.start().await.unwrap();
        sw
    }

    fn get(path: &str) -> WorkerRequest {
        WorkerRequest::get(&format!("{ORIGIN}{path}")).unwrap()
    }

    #[tokio::test]
    async fn test_static_cache_first() {
        let network = Arc::new(FakeNetwork::new().route("/app.js", StatusCode::OK, "code"));
        let sw = active_worker(network.clone()).await;

        let first = sw.handle_fetch(get("/app.js")).await.unwrap();
        assert_eq!(first.body, "code");

        network.set_offline(true);
        let second = sw.handle_fetch(get("/app.js")).await.unwrap();
        assert_eq!(second.body, "code");
        assert_eq!(network.calls(), 1, "second load must come from cache");
    }

    #[tokio::test]
    async fn test_static_offline_placeholder() {
        let network = Arc::new(FakeNetwork::new());
        let sw = active_worker(network.clone()).await;
        network.set_offline(true);

        let response = sw.handle_fetch(get("/app.css")).await.unwrap();
        assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_static_non_ok_not_cached() {
        let network = Arc::new(FakeNetwork::new());
        let sw = active_worker(network.clone()).await;

        let response = sw.handle_fetch(get("/missing.js")).await.unwrap();
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(sw.storage().entry_count(sw.static_cache()).await, 0);
    }

    #[tokio::test]
    async fn test_api_search_falls_back_to_cache() {
        let network = Arc::new(FakeNetwork::new());
        network.set_route(
            "/api/jobs/search?q=rust",
            WorkerResponse::json(StatusCode::OK, &json!({"jobs": [{"id": 1}]})),
        );
        let sw = active_worker(network.clone()).await;

        let fresh = sw.handle_fetch(get("/api/jobs/search?q=rust")).await.unwrap();
        assert!(fresh.ok());
        assert!(!fresh.is_cache_hit());

        network.set_offline(true);
        let cached = sw.handle_fetch(get("/api/jobs/search?q=rust")).await.unwrap();
        assert!(cached.is_cache_hit());
        assert_eq!(cached.json_body().unwrap(), json!({"jobs": [{"id": 1}]}));
    }

    #[tokio::test]
    async fn test_api_non_ok_falls_back_to_cache() {
        let network = Arc::new(FakeNetwork::new().route("/api/jobs/7", StatusCode::OK, "{}"));
        let sw = active_worker(network.clone()).await;
        sw.handle_fetch(get("/api/jobs/7")).await.unwrap();

        network.set_route(
            "/api/jobs/7",
            WorkerResponse::text(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
        );
        let response = sw.handle_fetch(get("/api/jobs/7")).await.unwrap();
        assert!(response.ok());
        assert!(response.is_cache_hit());
    }

    #[tokio::test]
    async fn test_api_non_ok_without_cache_passes_status_through() {
        let network = Arc::new(FakeNetwork::new().route("/api/jobs/999", StatusCode::NOT_FOUND, "no such job"));
        let sw = active_worker(network.clone()).await;

        let response = sw.handle_fetch(get("/api/jobs/999")).await.unwrap();
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.body, "no such job");
        assert!(!response.is_cache_hit());
        assert_eq!(sw.storage().entry_count(sw.dynamic_cache()).await, 0);
    }

    #[tokio::test]
    async fn test_api_jobs_offline_json() {
        let network = Arc::new(FakeNetwork::new());
        let sw = active_worker(network.clone()).await;
        network.set_offline(true);

        let response = sw.handle_fetch(get("/api/jobs/featured")).await.unwrap();
        assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.json_body().unwrap()["offline"], true);
    }

    #[tokio::test]
    async fn test_api_uncacheable_propagates_failure() {
        let network = Arc::new(FakeNetwork::new());
        let sw = active_worker(network.clone()).await;
        network.set_offline(true);

        let result = sw.handle_fetch(get("/api/users/me")).await;
        assert!(matches!(result, Err(AppError::Network(_))));
    }

    #[tokio::test]
    async fn test_api_uncacheable_not_stored() {
        let network = Arc::new(FakeNetwork::new().route("/api/users/me", StatusCode::OK, "{}"));
        let sw = active_worker(network.clone()).await;

        sw.handle_fetch(get("/api/users/me")).await.unwrap();
        assert_eq!(sw.storage().entry_count(sw.dynamic_cache()).await, 0);
    }

    #[tokio::test]
    async fn test_image_placeholder_when_offline() {
        let network = Arc::new(FakeNetwork::new());
        let sw = active_worker(network.clone()).await;
        network.set_offline(true);

        let response = sw.handle_fetch(get("/logos/acme.png")).await.unwrap();
        assert!(response.ok());
        assert_eq!(response.header("content-type"), Some("image/svg+xml"));
    }

    #[tokio::test]
    async fn test_image_cached_after_first_load() {
        let network = Arc::new(FakeNetwork::new().route("/logos/acme.png", StatusCode::OK, "PNG"));
        let sw = active_worker(network.clone()).await;

        sw.handle_fetch(get("/logos/acme.png")).await.unwrap();
        network.set_offline(true);
        let response = sw.handle_fetch(get("/logos/acme.png")).await.unwrap();
        assert_eq!(response.body, "PNG");
    }

    #[tokio::test]
    async fn test_navigation_falls_back_to_root_page() {
        let network = Arc::new(FakeNetwork::new().route("/", StatusCode::OK, "home"));
        let options = WorkerOptions {
            static_assets: vec!["/".to_string()],
            ..WorkerOptions::default()
        };
        let sw = ServiceWorker::new(options, network.clone());
        sw.start().await.unwrap();
        network.set_offline(true);

        let page = WorkerRequest::navigate(&format!("{ORIGIN}/jobs/99")).unwrap();
        let response = sw.handle_fetch(page).await.unwrap();
        assert_eq!(response.body, "home");
    }

    #[tokio::test]
    async fn test_navigation_without_cache_is_503() {
        let network = Arc::new(FakeNetwork::new());
        let sw = active_worker(network.clone()).await;
        network.set_offline(true);

        let page = WorkerRequest::navigate(&format!("{ORIGIN}/about")).unwrap();
        let response = sw.handle_fetch(page).await.unwrap();
        assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_navigation_serves_previously_visited_page() {
        let network = Arc::new(FakeNetwork::new().route("/jobs/5", StatusCode::OK, "job five"));
        let sw = active_worker(network.clone()).await;

        let page = || WorkerRequest::navigate(&format!("{ORIGIN}/jobs/5")).unwrap();
        sw.handle_fetch(page()).await.unwrap();
        network.set_offline(true);

        assert_eq!(sw.handle_fetch(page()).await.unwrap().body, "job five");
    }

    #[tokio::test]
    async fn test_other_requests_generic_503() {
        let network = Arc::new(FakeNetwork::new());
        let sw = active_worker(network.clone()).await;
        network.set_offline(true);

        let response = sw.handle_fetch(get("/robots")).await.unwrap();
        assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_non_get_bypasses_cache() {
        let network = Arc::new(FakeNetwork::new());
        let sw = active_worker(network.clone()).await;
        network.set_offline(true);

        let mut post = get("/api/jobs/search");
        post.method = Method::POST;
        assert!(sw.handle_fetch(post).await.is_err());
    }

    #[tokio::test]
    async fn test_not_intercepted_before_activation() {
        let network = Arc::new(FakeNetwork::new().route("/app.js", StatusCode::OK, "code"));
        let sw = ServiceWorker::new(WorkerOptions::default(), network.clone());

        sw.handle_fetch(get("/app.js")).await.unwrap();
        assert_eq!(sw.storage().entry_count(sw.static_cache()).await, 0);
    }
}
