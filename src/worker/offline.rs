//! Synthetic responses returned when neither network nor cache can answer.

use axum::http::StatusCode;
use serde_json::json;

use crate::worker::WorkerResponse;

const IMAGE_PLACEHOLDER_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="200" viewBox="0 0 200 200"><rect width="200" height="200" fill="#f3f4f6"/><text x="100" y="100" text-anchor="middle" dominant-baseline="middle" font-family="sans-serif" font-size="14" fill="#9ca3af">Image unavailable</text></svg>"##;

/// Static asset that is neither cached nor reachable.
pub fn asset_unavailable() -> WorkerResponse {
    WorkerResponse::text(StatusCode::SERVICE_UNAVAILABLE, "Offline - asset not available")
}

/// Structured offline error for the jobs API.
pub fn jobs_api_offline() -> WorkerResponse {
    WorkerResponse::json(
        StatusCode::SERVICE_UNAVAILABLE,
        &json!({
            "error": "Network unavailable",
            "message": "You are offline. Please check your connection and try again.",
            "offline": true
        }),
    )
}

/// Inline placeholder rendered in place of a missing image.
pub fn image_placeholder() -> WorkerResponse {
    WorkerResponse::with_content_type(StatusCode::OK, "image/svg+xml", IMAGE_PLACEHOLDER_SVG)
}

/// Page load with no network and no cached copy.
pub fn page_unavailable() -> WorkerResponse {
    WorkerResponse::text(
        StatusCode::SERVICE_UNAVAILABLE,
        "Offline - this page is not available offline",
    )
}

pub fn unavailable() -> WorkerResponse {
    WorkerResponse::text(StatusCode::SERVICE_UNAVAILABLE, "Service unavailable")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jobs_api_offline_shape() {
        let response = jobs_api_offline();
        assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.header("content-type"), Some("application/json"));

        let body = response.json_body().unwrap();
        assert_eq!(body["offline"], true);
        assert!(body["error"].is_string());
        assert!(body["message"].is_string());
    }

    #[test]
    fn test_image_placeholder_is_svg() {
        let response = image_placeholder();
        assert!(response.ok());
        assert_eq!(response.header("content-type"), Some("image/svg+xml"));
        assert!(response.body.starts_with(b"<svg"));
    }
}
