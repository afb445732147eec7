//! Error types for the activity roster service
//!
//! Roster operations return the typed [`RosterError`] so the HTTP layer can
//! map each kind to a status code. Everything else (configuration, seed
//! loading, startup) uses anyhow for consistent error handling.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Result type for roster operations
pub type RosterResult<T> = std::result::Result<T, RosterError>;

/// Errors produced by roster operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    #[error("Activity not found")]
    NotFound { activity: String },

    #[error("Student is already signed up for this activity")]
    AlreadyRegistered { activity: String, email: String },

    #[error("Student is not signed up for this activity")]
    NotRegistered { activity: String, email: String },

    #[error("Activity is full")]
    Full { activity: String, capacity: u32 },

    #[error("Internal roster error: {message}")]
    Internal { message: String },
}

impl RosterError {
    /// Short label used for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            RosterError::NotFound { .. } => "not_found",
            RosterError::AlreadyRegistered { .. } => "already_registered",
            RosterError::NotRegistered { .. } => "not_registered",
            RosterError::Full { .. } => "full",
            RosterError::Internal { .. } => "internal",
        }
    }

    /// Whether the error was caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        !matches!(self, RosterError::Internal { .. })
    }
}
