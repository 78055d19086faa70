//! Cached job board service
//!
//! Read methods go through the API cache with per-namespace TTLs; mutations
//! go straight to the API and then drop the namespaces they affect.

use std::sync::Arc;

use axum::http::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::cache::{fetch_with_cache, keys, CacheStats, SharedCache};
use crate::error::{AppError, Result};
use crate::services::JobApi;

/// Search filters accepted by `/api/jobs/search`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobSearchFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_min: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl JobSearchFilters {
    /// Query string in field-name order, without the leading `?`.
    pub fn to_query(&self) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        if let Ok(Value::Object(fields)) = serde_json::to_value(self) {
            for (name, value) in fields {
                match value {
                    Value::String(s) => query.append_pair(&name, &s),
                    other => query.append_pair(&name, &other.to_string()),
                };
            }
        }
        query.finish()
    }
}

// == Job Service ==
#[derive(Clone)]
pub struct JobService {
    api: Arc<dyn JobApi>,
    cache: SharedCache<Value>,
}

impl JobService {
    pub fn new(api: Arc<dyn JobApi>, cache: SharedCache<Value>) -> Self {
        Self { api, cache }
    }

    pub fn cache(&self) -> &SharedCache<Value> {
        &self.cache
    }

    pub async fn stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }

    // == Cached reads ==

    pub async fn search_jobs(&self, filters: &JobSearchFilters) -> Result<Value> {
        let query = filters.to_query();
        let path = if query.is_empty() {
            "/api/jobs/search".to_string()
        } else {
            format!("/api/jobs/search?{query}")
        };
        self.cached_get(&keys::job_search(filters)?, keys::SEARCH_TTL_MS, &path)
            .await
    }

    pub async fn get_job(&self, id: &str) -> Result<Value> {
        let id = validate_id(id)?;
        self.cached_get(&keys::job_detail(id), keys::JOB_DETAIL_TTL_MS, &format!("/api/jobs/{id}"))
            .await
    }

    pub async fn featured_jobs(&self, limit: u32) -> Result<Value> {
        self.cached_get(
            &keys::featured_jobs(limit),
            keys::FEATURED_TTL_MS,
            &format!("/api/jobs/featured?limit={limit}"),
        )
        .await
    }

    pub async fn recent_jobs(&self, limit: u32) -> Result<Value> {
        self.cached_get(
            &keys::recent_jobs(limit),
            keys::RECENT_TTL_MS,
            &format!("/api/jobs/recent?limit={limit}"),
        )
        .await
    }

    pub async fn candidate_applications(&self, candidate_id: &str) -> Result<Value> {
        let id = validate_id(candidate_id)?;
        self.cached_get(
            &keys::candidate_applications(id),
            keys::APPLICATIONS_TTL_MS,
            &format!("/api/applications/candidate/{id}"),
        )
        .await
    }

    pub async fn user_profile(&self, user_id: &str) -> Result<Value> {
        let id = validate_id(user_id)?;
        self.cached_get(
            &keys::user_profile(id),
            keys::PROFILE_TTL_MS,
            &format!("/api/users/{id}/profile"),
        )
        .await
    }

    // == Mutations ==

    pub async fn create_job(&self, job: Value) -> Result<Value> {
        let created = self.api.send_json(Method::POST, "/api/jobs", Some(job)).await?;
        self.invalidate_jobs().await;
        Ok(created)
    }

    pub async fn update_job(&self, id: &str, job: Value) -> Result<Value> {
        let id = validate_id(id)?;
        let updated = self
            .api
            .send_json(Method::PUT, &format!("/api/jobs/{id}"), Some(job))
            .await?;
        self.invalidate_jobs().await;
        Ok(updated)
    }

    pub async fn delete_job(&self, id: &str) -> Result<()> {
        let id = validate_id(id)?;
        self.api
            .send_json(Method::DELETE, &format!("/api/jobs/{id}"), None)
            .await?;
        self.invalidate_jobs().await;
        Ok(())
    }

    pub async fn apply_to_job(&self, application: Value) -> Result<Value> {
        let created = self
            .api
            .send_json(Method::POST, "/api/applications", Some(application))
            .await?;
        let removed = keys::invalidate_applications(&mut *self.cache.write().await);
        info!(removed, "applications cache invalidated");
        Ok(created)
    }

    pub async fn update_profile(&self, user_id: &str, profile: Value) -> Result<Value> {
        let id = validate_id(user_id)?;
        let updated = self
            .api
            .send_json(Method::PUT, &format!("/api/users/{id}/profile"), Some(profile))
            .await?;
        keys::invalidate_user(&mut *self.cache.write().await, id);
        Ok(updated)
    }

    /// Drops every cached `jobs:` entry. Returns how many were removed.
    pub async fn invalidate_jobs(&self) -> usize {
        let removed = keys::invalidate_jobs(&mut *self.cache.write().await);
        info!(removed, "jobs cache invalidated");
        removed
    }

    async fn cached_get(&self, key: &str, ttl: u64, path: &str) -> Result<Value> {
        let api = self.api.clone();
        let path = path.to_string();
        fetch_with_cache(&self.cache, key, Some(ttl), || async move {
            api.get_json(&path).await
        })
        .await
    }
}

impl std::fmt::Debug for JobService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobService").finish_non_exhaustive()
    }
}

/// Ids are interpolated into paths, so they must be a single segment.
fn validate_id(id: &str) -> Result<&str> {
    let id = id.trim();
    if id.is_empty() || id.contains(['/', '?', '#']) {
        return Err(AppError::InvalidRequest(format!("invalid id '{id}'")));
    }
    Ok(id)
}
