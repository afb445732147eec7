//! Activity Roster - signup service for school extracurricular activities
//!
//! This crate keeps an in-memory roster of activities and their
//! participants, and serves it over HTTP with endpoints to list activities,
//! sign a student up and unregister them.

pub mod config;
pub mod error;
pub mod metrics;
pub mod roster;
pub mod service;
pub mod types;
pub mod web;

// Re-export commonly used types and traits
pub use error::{Result, RosterError, RosterResult};
pub use types::*;

// Re-export key components
pub use roster::{RosterStore, SeedProvider, StaticSeedProvider};
pub use service::AppState;
pub use web::{build_router, HttpServer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
