//! Host allow-list consulted before credentials are attached to a request.
//!
//! # Design
//! Hosts are stored normalized (scheme prefix stripped, lower-cased,
//! trimmed, then canonicalized by the same WHATWG host parser that handles
//! request URLs) in a `HashSet`, so membership checks are independent of how
//! the host was spelled in configuration. An empty set means "no restriction".
//! Entries are only ever added: `set_allowed_hosts` merges into the existing
//! set instead of replacing it.
//!
//! Mutation takes `&mut self`. Callers sharing a validator across threads
//! wrap it in their own lock or finish configuring it before sharing.

use std::collections::HashSet;

use tracing::{debug, trace};
use url::{Host, Url};

use crate::error::{Error, Result};

const SCHEME_PREFIXES: [&str; 2] = ["https://", "http://"];

/// Maintains the set of hosts that may receive authenticated requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedHostsValidator {
    allowed_hosts: HashSet<String>,
}

impl AllowedHostsValidator {
    /// Create a validator from hosts that may carry an `http://` or
    /// `https://` prefix.
    pub fn new<I, S>(initial_hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut validator = Self::default();
        validator.set_allowed_hosts(initial_hosts);
        validator
    }

    /// Merge `hosts` into the allow-list. Existing entries are kept.
    pub fn set_allowed_hosts<I, S>(&mut self, hosts: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for host in hosts {
            let normalized = normalize_host(host.as_ref());
            trace!(host = host.as_ref(), %normalized, "adding allowed host");
            self.allowed_hosts.insert(normalized);
        }
    }

    /// The normalized hosts currently allowed, in no particular order.
    pub fn allowed_hosts(&self) -> Vec<String> {
        self.allowed_hosts.iter().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.allowed_hosts.is_empty()
    }

    /// Returns `true` if no hosts are configured or the host of `url` is in
    /// the allow-list.
    ///
    /// A URL that cannot be parsed, or that has no host component, is an
    /// error rather than `false`.
    pub fn is_url_host_valid(&self, url: &str) -> Result<bool> {
        if self.allowed_hosts.is_empty() {
            return Ok(true);
        }
        let host = extract_host(url)?;
        let valid = self.allowed_hosts.contains(&host);
        if !valid {
            debug!(%host, "host is not in the allow-list");
        }
        Ok(valid)
    }
}

impl<S: AsRef<str>> FromIterator<S> for AllowedHostsValidator {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<S: AsRef<str>> Extend<S> for AllowedHostsValidator {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.set_allowed_hosts(iter);
    }
}

/// Canonicalize a configured host: strip any `http://`/`https://` prefix
/// (matched case-insensitively, repeatedly), lower-case and trim, then run
/// it through the same host parser [`extract_host`] uses, so IDN names end
/// up as punycode and IPv4 shorthand as dotted quads. Entries the host
/// parser rejects (`example.com:8443`) are kept lower-cased as written.
///
/// Applying this twice gives the same result as applying it once.
pub fn normalize_host(host: &str) -> String {
    let mut rest = host.trim();
    while let Some(stripped) = strip_scheme_prefix(rest) {
        rest = stripped.trim_start();
    }
    let lowered = rest.to_lowercase();
    let lowered = lowered.trim();
    match Host::parse(lowered) {
        Ok(parsed) => parsed.to_string(),
        Err(_) => lowered.to_string(),
    }
}

fn strip_scheme_prefix(host: &str) -> Option<&str> {
    SCHEME_PREFIXES.iter().find_map(|prefix| {
        let head = host.get(..prefix.len())?;
        if head.eq_ignore_ascii_case(prefix) {
            host.get(prefix.len()..)
        } else {
            None
        }
    })
}

/// Extract the lower-cased host of `url`.
pub fn extract_host(url: &str) -> Result<String> {
    let parsed =
        Url::parse(url).map_err(|e| Error::invalid_input(format!("{url} is malformed: {e}")))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| Error::invalid_input(format!("{url} must contain host")))?;
    Ok(host.trim().to_lowercase())
}
