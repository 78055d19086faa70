//! Cache Storage
//!
//! Named partitions of request → response pairs shared by every fetch the
//! worker handles. Writes to the same key are last-write-wins.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use futures::future::try_join_all;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::worker::{Network, WorkerRequest, WorkerResponse};

type Partition = HashMap<String, WorkerResponse>;

// == Cache Storage ==
#[derive(Debug, Clone, Default)]
pub struct CacheStorage {
    partitions: Arc<RwLock<BTreeMap<String, Partition>>>,
}

impl CacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the partition if it does not exist yet.
    pub async fn open(&self, name: &str) {
        self.partitions
            .write()
            .await
            .entry(name.to_string())
            .or_default();
    }

    pub async fn has(&self, name: &str) -> bool {
        self.partitions.read().await.contains_key(name)
    }

    /// Deletes a partition and everything in it.
    pub async fn delete(&self, name: &str) -> bool {
        self.partitions.write().await.remove(name).is_some()
    }

    /// Partition names in sorted order.
    pub async fn keys(&self) -> Vec<String> {
        self.partitions.read().await.keys().cloned().collect()
    }

    /// Stores `response` for `request` in partition `name`, creating the
    /// partition on first use.
    pub async fn put(&self, name: &str, request: &WorkerRequest, response: WorkerResponse) {
        self.partitions
            .write()
            .await
            .entry(name.to_string())
            .or_default()
            .insert(request.cache_key().to_string(), response);
    }

    /// Looks `request` up in one partition.
    pub async fn match_in(&self, name: &str, request: &WorkerRequest) -> Option<WorkerResponse> {
        self.partitions
            .read()
            .await
            .get(name)
            .and_then(|partition| partition.get(request.cache_key()))
            .cloned()
    }

    /// Looks `request` up in every partition, in name order.
    pub async fn match_any(&self, request: &WorkerRequest) -> Option<WorkerResponse> {
        self.partitions
            .read()
            .await
            .values()
            .find_map(|partition| partition.get(request.cache_key()))
            .cloned()
    }

    /// Fetches every request and stores the responses in partition `name`.
    ///
    /// All or nothing: if any fetch fails or answers non-2xx, nothing is
    /// stored.
    pub async fn add_all(
        &self,
        name: &str,
        requests: &[WorkerRequest],
        network: &dyn Network,
    ) -> Result<()> {
        let responses = try_join_all(requests.iter().map(|request| async move {
            let response = network.fetch(request).await?;
            if response.ok() {
                Ok::<_, AppError>(response)
            } else {
                Err(AppError::UpstreamStatus {
                    status: response.status.as_u16(),
                    url: request.url.to_string(),
                })
            }
        }))
        .await?;

        let mut partitions = self.partitions.write().await;
        let partition = partitions.entry(name.to_string()).or_default();
        for (request, response) in requests.iter().zip(responses) {
            partition.insert(request.cache_key().to_string(), response);
        }
        debug!(partition = name, count = requests.len(), "partition populated");
        Ok(())
    }

    /// Number of stored responses in partition `name`.
    pub async fn entry_count(&self, name: &str) -> usize {
        self.partitions
            .read()
            .await
            .get(name)
            .map_or(0, HashMap::len)
    }

    /// Deletes every partition, returning how many were removed.
    pub async fn clear(&self) -> usize {
        let mut partitions = self.partitions.write().await;
        let count = partitions.len();
        partitions.clear();
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::testing::FakeNetwork;
    use axum::http::StatusCode;

    fn request(path: &str) -> WorkerRequest {
        WorkerRequest::get(&format!("http://localhost{path}")).unwrap()
    }

    #[tokio::test]
    async fn test_put_and_match() {
        let storage = CacheStorage::new();
        let response = WorkerResponse::text(StatusCode::OK, "body");

        storage.put("job-app-dynamic-v1", &request("/a"), response.clone()).await;

        assert_eq!(
            storage.match_in("job-app-dynamic-v1", &request("/a")).await,
            Some(response.clone())
        );
        assert_eq!(storage.match_in("job-app-static-v1", &request("/a")).await, None);
        assert_eq!(storage.match_any(&request("/a")).await, Some(response));
        assert_eq!(storage.match_any(&request("/b")).await, None);
    }

    #[tokio::test]
    async fn test_open_delete_keys() {
        let storage = CacheStorage::new();
        storage.open("b").await;
        storage.open("a").await;
        storage.open("a").await;

        assert_eq!(storage.keys().await, vec!["a", "b"]);
        assert!(storage.has("a").await);
        assert!(storage.delete("a").await);
        assert!(!storage.delete("a").await);
        assert_eq!(storage.clear().await, 1);
        assert!(storage.keys().await.is_empty());
    }

    #[tokio::test]
    async fn test_add_all_stores_every_response() {
        let storage = CacheStorage::new();
        let network = FakeNetwork::new()
            .route("/", StatusCode::OK, "home")
            .route("/jobs", StatusCode::OK, "jobs");

        storage
            .add_all("static", &[request("/"), request("/jobs")], &network)
            .await
            .unwrap();

        assert_eq!(storage.entry_count("static").await, 2);
        assert_eq!(
            storage.match_in("static", &request("/jobs")).await.unwrap().body,
            "jobs"
        );
    }

    #[tokio::test]
    async fn test_add_all_is_atomic() {
        let storage = CacheStorage::new();
        let network = FakeNetwork::new().route("/", StatusCode::OK, "home");

        let result = storage
            .add_all("static", &[request("/"), request("/missing")], &network)
            .await;

        assert!(matches!(result, Err(AppError::UpstreamStatus { status: 404, .. })));
        assert_eq!(storage.entry_count("static").await, 0);
    }
}
