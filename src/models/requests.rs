//! Request DTOs for the control and service endpoints
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;

/// Query for the featured and recent listings.
#[derive(Debug, Clone, Deserialize)]
pub struct ListQuery {
    /// Number of jobs to return (default 6)
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    6
}

impl ListQuery {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.limit == 0 || self.limit > 100 {
            return Some("limit must be between 1 and 100".to_string());
        }
        None
    }
}
