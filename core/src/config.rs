//! Client configuration consumed at setup time.
//!
//! The allow-list is the only setting the runtime owns. Unknown keys are
//! ignored so the same document can carry settings for other layers of the
//! client.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::allowed_hosts::AllowedHostsValidator;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    /// Hosts that may receive credentials, with or without a scheme prefix.
    /// Empty means every host.
    pub allowed_hosts: Vec<String>,
}

impl ClientConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw).map_err(|e| Error::Config(e.to_string()))?;
        debug!(allowed_hosts = config.allowed_hosts.len(), "loaded client config");
        Ok(config)
    }

    pub fn allowed_hosts_validator(&self) -> AllowedHostsValidator {
        AllowedHostsValidator::new(&self.allowed_hosts)
    }
}
