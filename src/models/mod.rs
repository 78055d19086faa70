//! Request and Response models for the control and service endpoints
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::ListQuery;
pub use responses::{
    ClickResponse, HealthResponse, InvalidateResponse, PartitionInfo, StatsResponse,
    WorkerStatusResponse,
};
