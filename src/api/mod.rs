//! API Module
//!
//! HTTP handlers and routing for the offline proxy server.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `/__sw/*` - Worker status, messages, push and notification clicks
//! - `/svc/*` - Job board reads through the API cache
//! - everything else - proxied through the offline worker

pub mod handlers;
pub mod proxy;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
