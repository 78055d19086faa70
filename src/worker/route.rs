//! Request Classification
//!
//! Decides which caching strategy answers an intercepted request. The first
//! matching class wins, in the order of [`RequestKind`].

use crate::worker::{RequestMode, WorkerRequest};

const STATIC_EXTENSIONS: &[&str] = &["js", "mjs", "css", "woff", "woff2", "ttf", "otf", "eot", "ico"];
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "svg", "avif", "bmp"];

/// API collections whose GET responses are kept for offline use.
const CACHEABLE_API_PREFIXES: &[&str] = &["/api/jobs/search", "/api/jobs/featured", "/api/jobs/recent"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Script, style, font or icon
    StaticAsset,
    /// Anything under `/api/`
    Api,
    Image,
    /// Full page load
    Navigation,
    Other,
}

pub fn classify(request: &WorkerRequest) -> RequestKind {
    let path = request.path();

    if has_extension(path, STATIC_EXTENSIONS) {
        RequestKind::StaticAsset
    } else if path.starts_with("/api/") {
        RequestKind::Api
    } else if has_extension(path, IMAGE_EXTENSIONS) {
        RequestKind::Image
    } else if request.mode == RequestMode::Navigate {
        RequestKind::Navigation
    } else {
        RequestKind::Other
    }
}

/// Whether a GET on `path` may be stored in the dynamic partition.
///
/// Matches the search, featured and recent listings and single jobs by id
/// (`/api/jobs/<id>`).
pub fn is_cacheable_api(path: &str) -> bool {
    if CACHEABLE_API_PREFIXES
        .iter()
        .any(|prefix| path == *prefix || path.starts_with(&format!("{prefix}/")))
    {
        return true;
    }

    match path.strip_prefix("/api/jobs/") {
        Some(id) => !id.is_empty() && !id.contains('/'),
        None => false,
    }
}

/// Whether `path` belongs to the jobs API, which gets a structured offline
/// error instead of a failure.
pub fn is_jobs_api(path: &str) -> bool {
    path == "/api/jobs" || path.starts_with("/api/jobs/")
}

fn has_extension(path: &str, extensions: &[&str]) -> bool {
    let file = path.rsplit('/').next().unwrap_or(path);
    match file.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => {
            extensions.iter().any(|e| ext.eq_ignore_ascii_case(e))
        }
        _ => false,
    }
}
