//! Error types for the user-record layer.

/// Errors that can occur while loading user records.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// The user source could not be read.
    #[error("failed to load users: {0}")]
    Load(#[source] std::io::Error),
}
