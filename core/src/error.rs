//! Error types for the request-preparation runtime.
//!
//! # Design
//! Host validation and scalar formatting share a single `InvalidInput`
//! kind: both are pure checks on caller-supplied values, so the caller only
//! needs to know that the value was rejected and why. Configuration and
//! token-provider failures get their own variants because they originate
//! outside the value being validated.

/// Errors returned by the allow-list, the scalar codec and the
/// authentication providers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A URL, duration, date-time or credential argument was rejected.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A configuration document could not be deserialized.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// An `AccessTokenProvider` failed to produce a token.
    #[error("token provider failed: {0}")]
    TokenProvider(String),
}

impl Error {
    pub(crate) fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }
}

/// Shorthand `Result` that always uses [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
