//! Assembler configuration.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

/// Default deadline for resolving one document's content: 60 seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 60;

/// Configuration for [`PacketAssembler`](crate::PacketAssembler).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct AssemblerConfig {
    /// Deadline for resolving one document's content in seconds
    #[cfg_attr(
        feature = "config",
        arg(long = "fetch-timeout", env = "DOCUMENT_FETCH_TIMEOUT", default_value = "60")
    )]
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout: u64,
}

fn default_fetch_timeout() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: default_fetch_timeout(),
        }
    }
}

impl AssemblerConfig {
    /// Set the per-document timeout in seconds.
    #[must_use]
    pub fn with_fetch_timeout(mut self, timeout_secs: u64) -> Self {
        self.fetch_timeout = timeout_secs;
        self
    }

    /// Returns the effective per-document timeout, using default if zero.
    pub fn effective_fetch_timeout(&self) -> Duration {
        match self.fetch_timeout {
            0 => Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            secs => Duration::from_secs(secs),
        }
    }
}
