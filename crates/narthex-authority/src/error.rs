//! Error types for the credential layer.

/// Errors from parsing or validating credential data.
#[derive(Debug, thiserror::Error)]
pub enum AuthorityError {
    /// The string is not a display number (`"5"` or `":5"`).
    #[error("invalid display number {0:?}")]
    InvalidDisplayNumber(String),
}
