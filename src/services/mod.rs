//! Services Module
//!
//! Cache-backed access to the job board REST API for UI-facing callers.

mod client;
mod jobs;

pub use client::{JobApi, WorkerJobApi};
pub use jobs::{JobSearchFilters, JobService};
