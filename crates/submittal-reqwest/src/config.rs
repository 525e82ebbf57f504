//! Renderer client configuration.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// Default renderer base URL.
pub const DEFAULT_RENDERER_URL: &str = "http://localhost:3001";

/// Default deadline for a single render call: 120 seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Path of the packet generation endpoint, relative to the base URL.
const GENERATE_PATH: &str = "generate-packet";

/// Path of the health endpoint, relative to the base URL.
const HEALTH_PATH: &str = "health";

/// Configuration for the renderer HTTP client.
///
/// Resolved once at startup and shared by every assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct RendererConfig {
    /// Base URL of the packet renderer
    #[cfg_attr(
        feature = "config",
        arg(long = "renderer-url", env = "RENDERER_URL", default_value = DEFAULT_RENDERER_URL)
    )]
    #[serde(default = "default_renderer_url")]
    pub renderer_url: String,

    /// Deadline for one render call in seconds
    #[cfg_attr(
        feature = "config",
        arg(long = "renderer-timeout", env = "RENDERER_TIMEOUT", default_value = "120")
    )]
    #[serde(default = "default_timeout_secs")]
    pub renderer_timeout: u64,

    /// User-Agent header to send with requests
    #[cfg_attr(
        feature = "config",
        arg(long = "renderer-user-agent", env = "RENDERER_USER_AGENT")
    )]
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_renderer_url() -> String {
    DEFAULT_RENDERER_URL.to_owned()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            renderer_url: default_renderer_url(),
            renderer_timeout: default_timeout_secs(),
            user_agent: None,
        }
    }
}

impl RendererConfig {
    /// Creates a configuration for the given base URL.
    pub fn new(renderer_url: impl Into<String>) -> Self {
        Self {
            renderer_url: renderer_url.into(),
            ..Default::default()
        }
    }

    /// Set the timeout in seconds.
    #[must_use]
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.renderer_timeout = timeout_secs;
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Returns the effective timeout, using default if zero.
    pub fn effective_timeout(&self) -> Duration {
        if self.renderer_timeout == 0 {
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        } else {
            Duration::from_secs(self.renderer_timeout)
        }
    }

    /// Returns the effective user agent, using default if not set.
    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("submittal/{}", env!("CARGO_PKG_VERSION")))
    }

    /// Parses the base URL; only `http` and `https` are accepted.
    pub fn base_url(&self) -> Result<Url> {
        let mut url = Url::parse(self.renderer_url.trim())
            .map_err(|e| Error::InvalidUrl(format!("'{}': {e}", self.renderer_url)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::InvalidUrl(format!(
                "'{}': scheme must be http or https",
                self.renderer_url
            )));
        }

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(url)
    }

    /// URL of the packet generation endpoint.
    pub fn generate_url(&self) -> Result<Url> {
        Ok(self.base_url()?.join(GENERATE_PATH)?)
    }

    /// URL of the health endpoint.
    pub fn health_url(&self) -> Result<Url> {
        Ok(self.base_url()?.join(HEALTH_PATH)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        self.generate_url().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RendererConfig::default();
        assert_eq!(config.renderer_url, DEFAULT_RENDERER_URL);
        assert_eq!(config.effective_timeout(), Duration::from_secs(120));
        assert!(config.user_agent.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_generate_url() {
        let config = RendererConfig::new("https://render.example.com");
        assert_eq!(
            config.generate_url().unwrap().as_str(),
            "https://render.example.com/generate-packet"
        );

        let config = RendererConfig::new("https://example.com/worker");
        assert_eq!(
            config.generate_url().unwrap().as_str(),
            "https://example.com/worker/generate-packet"
        );
        assert_eq!(
            config.health_url().unwrap().as_str(),
            "https://example.com/worker/health"
        );
    }

    #[test]
    fn test_invalid_urls() {
        assert!(RendererConfig::new("localhost:3001").validate().is_err());
        assert!(RendererConfig::new("ftp://example.com").validate().is_err());
        assert!(RendererConfig::new("").validate().is_err());
    }

    #[test]
    fn test_builder_pattern() {
        let config = RendererConfig::default()
            .with_timeout(0)
            .with_user_agent("custom-agent/1.0");

        assert_eq!(
            config.effective_timeout(),
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        );
        assert_eq!(config.effective_user_agent(), "custom-agent/1.0");
        assert!(
            RendererConfig::default()
                .effective_user_agent()
                .starts_with("submittal/")
        );
    }
}
