//! Error types for credential operations.

use thiserror::Error;

/// Credential operation errors.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Password hashing failed.
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    /// Stored hash could not be parsed as a PHC string.
    #[error("Invalid stored password hash: {0}")]
    InvalidHash(String),

    /// Password too short.
    #[error("Password too short (minimum {0} characters required)")]
    PasswordTooShort(usize),
}

/// Result type for credential operations.
pub type AuthResult<T> = std::result::Result<T, AuthError>;
