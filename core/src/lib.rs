//! Request-preparation runtime for generated API clients.
//!
//! # Overview
//! Two independent pieces with real logic, plus the collaborators that use
//! them:
//! - [`AllowedHostsValidator`] decides whether a request URL may receive
//!   credentials.
//! - [`scalar`] renders booleans, date-times and [`IsoDuration`]s in the
//!   canonical strings written into bodies and query parameters.
//! - [`auth`] attaches bearer tokens or API keys to an [`HttpRequest`], but
//!   only for allowed hosts.
//!
//! # Design
//! - No I/O anywhere. Requests are plain data; the caller owns transport.
//! - The validator is built once from [`ClientConfig`] and may be extended
//!   later. Entries are never removed.
//! - All failures are [`Error`] values propagated with `?`.

pub mod allowed_hosts;
pub mod auth;
pub mod config;
pub mod duration;
pub mod error;
pub mod http;
pub mod scalar;

pub use allowed_hosts::{extract_host, normalize_host, AllowedHostsValidator};
pub use auth::{
    AccessTokenProvider, ApiKeyAuthenticationProvider, ApiKeyLocation, AuthenticationProvider,
    BaseBearerTokenAuthenticationProvider,
};
pub use config::ClientConfig;
pub use duration::IsoDuration;
pub use error::{Error, Result};
pub use http::{HttpMethod, HttpRequest};
