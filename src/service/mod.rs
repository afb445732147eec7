//! Service layer for the activity roster service
//!
//! This module contains the main application state, lifecycle management
//! and health checks.

pub mod app;
pub mod health;

pub use app::{AppState, ServiceError};
pub use health::{HealthCheck, HealthStatus};
