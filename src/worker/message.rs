//! Page → worker messages.

use axum::http::Method;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::worker::{RequestMode, ServiceWorker, WorkerRequest, WorkerState};

/// Commands posted by a page. There is no reply channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerMessage {
    /// Activate a waiting worker now
    SkipWaiting,
    /// Warm the dynamic partition with these URLs
    CacheUrls { urls: Vec<String> },
    /// Delete every partition
    ClearCache,
}

impl ServiceWorker {
    pub async fn handle_message(&self, message: WorkerMessage) {
        match message {
            WorkerMessage::SkipWaiting => {
                self.skip_waiting();
                if self.state().await == WorkerState::Installed {
                    self.activate().await;
                }
            }
            WorkerMessage::CacheUrls { urls } => {
                let cached = self.cache_urls(&urls).await;
                info!(requested = urls.len(), cached, "dynamic partition warmed");
            }
            WorkerMessage::ClearCache => {
                let removed = self.storage().clear().await;
                info!(removed, "all cache partitions cleared");
            }
        }
    }

    /// Fetches each URL and stores 2xx responses in the dynamic partition.
    /// URLs are independent; a failure is logged and skipped.
    async fn cache_urls(&self, urls: &[String]) -> usize {
        let mut cached = 0;

        for raw in urls {
            let request = match self.origin().join(raw) {
                Ok(url) => WorkerRequest::new(Method::GET, url, RequestMode::Cors),
                Err(e) => {
                    warn!(url = %raw, error = %e, "skipping unparsable url");
                    continue;
                }
            };

            match self.network().fetch(&request).await {
                Ok(response) if response.ok() => {
                    self.storage()
                        .put(self.dynamic_cache(), &request, response)
                        .await;
                    cached += 1;
                }
                Ok(response) => {
                    warn!(url = %request.url, status = %response.status, "not caching non-ok response");
                }
                Err(e) => warn!(url = %request.url, error = %e, "failed to warm url"),
            }
        }

        cached
    }
}
