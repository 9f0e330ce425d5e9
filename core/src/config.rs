//! Client configuration. Backend origin only; there are no timeout, retry
//! or pooling knobs.

use std::sync::Arc;

use serde::Deserialize;

use crate::client::{Backend, BrikClient};
use crate::transport::UreqTransport;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ClientConfig {
    /// Backend origin. Read from BRIK_API_BASE_URL.
    #[serde(default)]
    pub api_base_url: Option<String>,
}

impl ClientConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("BRIK"))
            .build()?
            .try_deserialize()
    }

    pub fn api_base_url_or_default(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL)
    }

    /// A `Backend` talking to the configured origin over ureq.
    pub fn backend(&self) -> Backend {
        Backend::new(
            BrikClient::new(self.api_base_url_or_default()),
            Arc::new(UreqTransport::new()),
        )
    }
}
