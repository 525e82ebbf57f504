//! Presenter configuration.

use std::path::PathBuf;
use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

/// Default delay before a preview file is removed: 5 seconds.
pub const DEFAULT_RELEASE_DELAY_MS: u64 = 5_000;

/// Configuration for [`ArtifactPresenter`](crate::ArtifactPresenter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct PresenterConfig {
    /// Directory downloaded packets are saved to
    #[cfg_attr(
        feature = "config",
        arg(long = "download-dir", env = "DOWNLOAD_DIR", default_value = ".")
    )]
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// Delay before a preview file is removed, in milliseconds
    #[cfg_attr(
        feature = "config",
        arg(
            long = "preview-release-delay",
            env = "PREVIEW_RELEASE_DELAY_MS",
            default_value = "5000"
        )
    )]
    #[serde(default = "default_release_delay_ms")]
    pub release_delay_ms: u64,
}

fn default_download_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_release_delay_ms() -> u64 {
    DEFAULT_RELEASE_DELAY_MS
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
            release_delay_ms: default_release_delay_ms(),
        }
    }
}

impl PresenterConfig {
    /// Creates a configuration saving into the given directory.
    pub fn new(download_dir: impl Into<PathBuf>) -> Self {
        Self {
            download_dir: download_dir.into(),
            ..Default::default()
        }
    }

    /// Set the preview release delay in milliseconds.
    #[must_use]
    pub fn with_release_delay(mut self, delay_ms: u64) -> Self {
        self.release_delay_ms = delay_ms;
        self
    }

    pub fn release_delay(&self) -> Duration {
        Duration::from_millis(self.release_delay_ms)
    }

    /// Checks that the download directory exists.
    pub fn validate(&self) -> std::io::Result<()> {
        let metadata = std::fs::metadata(&self.download_dir)?;
        if !metadata.is_dir() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotADirectory,
                format!("{} is not a directory", self.download_dir.display()),
            ));
        }
        Ok(())
    }
}
