//! HTTP layer for the activity roster service
//!
//! Routes translate requests into roster calls and roster errors into
//! status codes; the roster itself knows nothing about HTTP.

pub mod error;
pub mod health;
pub mod routes;
pub mod server;

pub use error::{ApiError, ErrorBody};
pub use routes::MessageResponse;
pub use server::{build_router, HttpServer};
