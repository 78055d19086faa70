//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - API cache cleanup: sweeps expired entries at the configured interval

mod cleanup;

pub use cleanup::CleanupTask;
