//! Activity roster for the signup service
//!
//! This module holds the in-memory roster of activities and participants,
//! and the seed providers it is populated from at startup.

pub mod seed;
pub mod store;

// Re-export commonly used types
pub use seed::{validate_seed, FileSeedProvider, SeedProvider, StaticSeedProvider};
pub use store::{RosterStats, RosterStore};
