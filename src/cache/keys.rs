//! Cache Keys Module
//!
//! Key builders for the API cache namespaces, per-namespace TTLs and the
//! namespace invalidation helpers run after mutations.

use serde::Serialize;

use crate::cache::ApiCache;
use crate::error::{AppError, Result};

// == Namespaces ==
pub const JOBS_PREFIX: &str = "jobs:";
pub const APPLICATIONS_PREFIX: &str = "applications:";
pub const USERS_PREFIX: &str = "users:";

// == TTLs (milliseconds) ==
pub const SEARCH_TTL_MS: u64 = 2 * 60 * 1000;
pub const JOB_DETAIL_TTL_MS: u64 = 5 * 60 * 1000;
pub const FEATURED_TTL_MS: u64 = 10 * 60 * 1000;
pub const RECENT_TTL_MS: u64 = 2 * 60 * 1000;
pub const APPLICATIONS_TTL_MS: u64 = 60 * 1000;
pub const PROFILE_TTL_MS: u64 = 5 * 60 * 1000;

/// `jobs:search:<json-of-filters>`.
///
/// Filters go through `serde_json::Value`, whose maps keep keys sorted, so
/// two filter sets with the same fields produce the same key. Filters that
/// do not serialize to JSON (non-string map keys) are rejected.
pub fn job_search<F: Serialize + ?Sized>(filters: &F) -> Result<String> {
    let canonical = serde_json::to_value(filters)
        .map_err(|e| AppError::InvalidRequest(format!("unserializable search filters: {e}")))?;
    Ok(format!("{JOBS_PREFIX}search:{canonical}"))
}

pub fn job_detail(id: &str) -> String {
    format!("{JOBS_PREFIX}detail:{id}")
}

pub fn featured_jobs(limit: u32) -> String {
    format!("{JOBS_PREFIX}featured:{limit}")
}

pub fn recent_jobs(limit: u32) -> String {
    format!("{JOBS_PREFIX}recent:{limit}")
}

pub fn candidate_applications(candidate_id: &str) -> String {
    format!("{APPLICATIONS_PREFIX}candidate:{candidate_id}")
}

pub fn user_profile(user_id: &str) -> String {
    format!("{USERS_PREFIX}profile:{user_id}")
}

// == Invalidation ==
/// Drops every `jobs:` entry. Run after any job mutation.
pub fn invalidate_jobs<T: Clone>(cache: &mut ApiCache<T>) -> usize {
    cache.invalidate_prefix(JOBS_PREFIX)
}

/// Drops every `applications:` entry.
pub fn invalidate_applications<T: Clone>(cache: &mut ApiCache<T>) -> usize {
    cache.invalidate_prefix(APPLICATIONS_PREFIX)
}

/// Drops the cached profile of a single user.
pub fn invalidate_user<T: Clone>(cache: &mut ApiCache<T>, user_id: &str) -> usize {
    usize::from(cache.delete(&user_profile(user_id)))
}
