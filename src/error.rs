//! Typed errors for the few places where callers need to branch on the failure
//! kind. Everything else in the crate reports through `anyhow` with context.

/// A stored or user-supplied label did not match any known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} `{value}`")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Failures while hashing or accepting an admin password.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Password must be at least {0} characters long")]
    TooShort(usize),

    #[error("password hashing failed: {0}")]
    Hash(#[from] argon2::password_hash::Error),
}

/// Configuration could not be resolved from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not locate home directory")]
    NoHomeDir,

    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}
