//! # docuflow-auth
//!
//! Credential primitives for DocuFlow: Argon2id password hashing and
//! opaque bearer-token generation. Kept separate from the database and
//! API layers so cryptographic choices live in one place.

pub mod error;
pub mod password;
pub mod token;

pub use error::{AuthError, AuthResult};
pub use password::{hash_password, verify_password, MIN_PASSWORD_LENGTH};
pub use token::{
    default_token_ttl, generate_token, hash_token, looks_like_token, TOKEN_PREFIX,
};
