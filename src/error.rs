//! Error types for the AnalystTrack application.

use thiserror::Error;

/// Failure classes reported by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    /// The email address is malformed.
    InvalidEmail,
    /// No account exists for the email address.
    UserNotFound,
    /// The password does not match the account.
    WrongPassword,
    /// An account already exists for the email address.
    EmailAlreadyInUse,
    /// The password is shorter than the provider accepts.
    WeakPassword,
    /// The operation requires a signed-in principal.
    NotSignedIn,
}

impl AuthErrorKind {
    /// Message shown inline on the login form.
    pub fn message(&self) -> &'static str {
        match self {
            Self::InvalidEmail => "The email address is badly formatted.",
            Self::UserNotFound => "There is no account for this email address.",
            Self::WrongPassword => "The password is invalid.",
            Self::EmailAlreadyInUse => "The email address is already in use by another account.",
            Self::WeakPassword => "Password should be at least 6 characters.",
            Self::NotSignedIn => "You must be signed in to do that.",
        }
    }
}

impl std::fmt::Display for AuthErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// The main error type for AnalystTrack.
#[derive(Error, Debug)]
pub enum Error {
    /// IO errors (file operations, terminal, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Channel communication errors
    #[error("Channel error: {0}")]
    Channel(String),

    /// Identity provider rejected the request
    #[error("Authentication error: {0}")]
    Authentication(AuthErrorKind),

    /// Missing or malformed user input, caught before any write
    #[error("Validation error: {0}")]
    Validation(String),

    /// Document store read failed
    #[error("Lookup error: {0}")]
    Lookup(String),

    /// Document store write was rejected
    #[error("Write error: {0}")]
    Write(String),
}

/// Alias for Result with our Error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new channel error.
    pub fn channel(msg: impl Into<String>) -> Self {
        Self::Channel(msg.into())
    }

    /// Create a new validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new lookup error.
    pub fn lookup(msg: impl Into<String>) -> Self {
        Self::Lookup(msg.into())
    }

    /// Create a new write error.
    pub fn write(msg: impl Into<String>) -> Self {
        Self::Write(msg.into())
    }

    /// Turn any store failure into a write failure, keeping the message.
    pub fn into_write(self) -> Self {
        match self {
            Self::Write(_) => self,
            other => Self::Write(other.to_string()),
        }
    }

    /// Turn any store failure into a lookup failure, keeping the message.
    pub fn into_lookup(self) -> Self {
        match self {
            Self::Lookup(_) => self,
            other => Self::Lookup(other.to_string()),
        }
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
