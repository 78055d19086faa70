//! Job Board Offline - API cache and offline worker for a job board frontend
//!
//! Provides a TTL cache for job board API reads and a request-intercepting
//! worker that serves cached assets, API responses and pages when the
//! upstream is unreachable.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod tasks;
pub mod worker;

pub use api::AppState;
pub use config::Config;
pub use tasks::CleanupTask;
