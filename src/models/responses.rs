//! Response DTOs for the control and service endpoints
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::worker::WorkerState;

/// Response body for the API cache stats endpoint (GET /svc/cache/stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Reads answered by a fresh entry
    pub hits: u64,
    /// Reads that found nothing or a stale entry
    pub misses: u64,
    /// Entries removed after their ttl elapsed
    pub expirations: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
        }
    }
}

/// One cache partition in the worker status.
#[derive(Debug, Clone, Serialize)]
pub struct PartitionInfo {
    pub name: String,
    pub entries: usize,
}

/// Response body for the worker status endpoint (GET /__sw/status)
#[derive(Debug, Clone, Serialize)]
pub struct WorkerStatusResponse {
    pub state: WorkerState,
    pub clients_claimed: bool,
    pub static_cache: String,
    pub dynamic_cache: String,
    pub partitions: Vec<PartitionInfo>,
}

/// Response body for a notification click (POST /__sw/notificationclick)
#[derive(Debug, Clone, Serialize)]
pub struct ClickResponse {
    /// URL to open, null if the click only dismissed the notification
    pub open_url: Option<String>,
}

/// Response body for a namespace invalidation (DELETE /svc/cache/jobs)
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    pub message: String,
    pub removed: usize,
}

impl InvalidateResponse {
    pub fn new(namespace: &str, removed: usize) -> Self {
        Self {
            message: format!("Invalidated {} '{}' entries", removed, namespace),
            removed,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_response_from_stats() {
        let stats = CacheStats {
            hits: 80,
            misses: 20,
            expirations: 5,
            total_entries: 12,
        };
        let resp = StatsResponse::from(stats);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
        assert_eq!(resp.total_entries, 12);
    }

    #[test]
    fn test_worker_status_serialize() {
        let resp = WorkerStatusResponse {
            state: WorkerState::Activated,
            clients_claimed: true,
            static_cache: "job-app-static-v1".into(),
            dynamic_cache: "job-app-dynamic-v1".into(),
            partitions: vec![PartitionInfo {
                name: "job-app-static-v1".into(),
                entries: 4,
            }],
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["state"], "activated");
        assert_eq!(json["partitions"][0]["entries"], 4);
    }

    #[test]
    fn test_invalidate_response_message() {
        let resp = InvalidateResponse::new("jobs", 3);
        assert_eq!(resp.message, "Invalidated 3 'jobs' entries");
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
