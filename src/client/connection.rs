use std::time::Duration;

use anyhow::Context;
use url::Url;

/// Shared HTTP agent bound to the origin that serves the cart endpoints.
#[derive(Debug, Clone)]
pub struct HttpConnection {
    agent: ureq::Agent,
    base_url: Url,
}

pub struct ConnectionConfig {
    pub base_url: Url,
    /// Overall per-request timeout. `None` leaves it to the network stack.
    pub timeout: Option<Duration>,
}

impl HttpConnection {
    pub fn new(config: &ConnectionConfig) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        tracing::info!("HTTP client ready for {}", config.base_url);
        HttpConnection {
            agent: builder.build(),
            base_url: config.base_url.clone(),
        }
    }

    pub fn from_url(base_url: &str) -> Result<Self, anyhow::Error> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid base url: {}", base_url))?;
        Ok(Self::new(&ConnectionConfig {
            base_url,
            timeout: None,
        }))
    }

    pub fn agent(&self) -> &ureq::Agent {
        &self.agent
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}
