//! Authentication providers that attach credentials only to allowed hosts.
//!
//! # Design
//! Token acquisition lives behind `AccessTokenProvider`; this module only
//! decides whether and where a credential goes. Every provider consults an
//! `AllowedHostsValidator` first and leaves the request untouched when the
//! host is not allowed. Malformed request URLs are errors, not silent skips.

use std::collections::HashMap;

use tracing::debug;
use url::Url;

use crate::allowed_hosts::AllowedHostsValidator;
use crate::error::{Error, Result};
use crate::http::HttpRequest;

pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Additional-context key carrying claims from a continuous access
/// evaluation challenge. Its presence forces a fresh token.
pub const CLAIMS_KEY: &str = "claims";

/// Source of access tokens for bearer authentication.
pub trait AccessTokenProvider {
    /// Return a token for `url`, or an empty string to skip authentication.
    fn get_authorization_token(
        &self,
        url: &str,
        additional_context: &HashMap<String, String>,
    ) -> Result<String>;

    /// Hosts this provider may hand tokens to.
    fn allowed_hosts_validator(&self) -> &AllowedHostsValidator;
}

/// Adds credentials to an outgoing request.
pub trait AuthenticationProvider {
    fn authenticate_request(
        &self,
        request: &mut HttpRequest,
        additional_context: &HashMap<String, String>,
    ) -> Result<()>;
}

/// Adds `Authorization: Bearer <token>` using an [`AccessTokenProvider`].
#[derive(Debug, Clone)]
pub struct BaseBearerTokenAuthenticationProvider<P> {
    access_token_provider: P,
}

impl<P: AccessTokenProvider> BaseBearerTokenAuthenticationProvider<P> {
    pub fn new(access_token_provider: P) -> Self {
        Self {
            access_token_provider,
        }
    }

    pub fn access_token_provider(&self) -> &P {
        &self.access_token_provider
    }
}

impl<P: AccessTokenProvider> AuthenticationProvider for BaseBearerTokenAuthenticationProvider<P> {
    fn authenticate_request(
        &self,
        request: &mut HttpRequest,
        additional_context: &HashMap<String, String>,
    ) -> Result<()> {
        if additional_context.contains_key(CLAIMS_KEY) {
            request.remove_header(AUTHORIZATION_HEADER);
        }
        if request.header(AUTHORIZATION_HEADER).is_some() {
            return Ok(());
        }

        let validator = self.access_token_provider.allowed_hosts_validator();
        if !validator.is_url_host_valid(&request.url)? {
            debug!(url = %request.url, "skipping bearer token for disallowed host");
            return Ok(());
        }

        let token = self
            .access_token_provider
            .get_authorization_token(&request.url, additional_context)?;
        if token.is_empty() {
            debug!(url = %request.url, "token provider returned an empty token");
            return Ok(());
        }
        request.add_header(AUTHORIZATION_HEADER, format!("Bearer {token}"));
        Ok(())
    }
}

/// Where an API key is placed on the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeyLocation {
    Header,
    QueryParameter,
}

/// Adds a static API key as a header or query parameter.
#[derive(Debug, Clone)]
pub struct ApiKeyAuthenticationProvider {
    api_key: String,
    parameter_name: String,
    location: ApiKeyLocation,
    allowed_hosts: AllowedHostsValidator,
}

impl ApiKeyAuthenticationProvider {
    pub fn new(
        api_key: impl Into<String>,
        parameter_name: impl Into<String>,
        location: ApiKeyLocation,
        allowed_hosts: AllowedHostsValidator,
    ) -> Result<Self> {
        let api_key = api_key.into();
        let parameter_name = parameter_name.into();
        if api_key.trim().is_empty() {
            return Err(Error::invalid_input("api key cannot be empty"));
        }
        if parameter_name.trim().is_empty() {
            return Err(Error::invalid_input("parameter name cannot be empty"));
        }
        Ok(Self {
            api_key,
            parameter_name,
            location,
            allowed_hosts,
        })
    }

    pub fn allowed_hosts_validator(&self) -> &AllowedHostsValidator {
        &self.allowed_hosts
    }

    pub fn allowed_hosts_validator_mut(&mut self) -> &mut AllowedHostsValidator {
        &mut self.allowed_hosts
    }
}

impl AuthenticationProvider for ApiKeyAuthenticationProvider {
    fn authenticate_request(
        &self,
        request: &mut HttpRequest,
        _additional_context: &HashMap<String, String>,
    ) -> Result<()> {
        if !self.allowed_hosts.is_url_host_valid(&request.url)? {
            debug!(url = %request.url, "skipping api key for disallowed host");
            return Ok(());
        }
        match self.location {
            ApiKeyLocation::Header => {
                request.add_header(self.parameter_name.as_str(), self.api_key.as_str());
            }
            ApiKeyLocation::QueryParameter => {
                let mut url = Url::parse(&request.url)
                    .map_err(|e| Error::invalid_input(format!("{} is malformed: {e}", request.url)))?;
                url.query_pairs_mut()
                    .append_pair(&self.parameter_name, &self.api_key);
                request.url = url.into();
            }
        }
        Ok(())
    }
}
