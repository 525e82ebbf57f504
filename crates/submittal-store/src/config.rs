//! Document store configuration.

#[cfg(feature = "config")]
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use submittal_core::{StoreError, StoreResult};
use url::Url;

/// Default public base URL of stored content.
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:3002/files/";

/// Storage backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString)]
#[cfg_attr(feature = "config", derive(ValueEnum))]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BackendType {
    /// Process-local memory; contents vanish on exit.
    Memory,
    /// Local filesystem rooted at [`StoreConfig::store_root`].
    #[default]
    Fs,
}

/// Configuration for the document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct StoreConfig {
    /// Storage backend
    #[cfg_attr(
        feature = "config",
        arg(long = "store-backend", env = "STORE_BACKEND", value_enum, default_value = "fs")
    )]
    #[serde(default)]
    pub store_backend: BackendType,

    /// Root directory of the filesystem backend
    #[cfg_attr(
        feature = "config",
        arg(long = "store-root", env = "STORE_ROOT", default_value = "./submittal-data")
    )]
    #[serde(default = "default_root")]
    pub store_root: String,

    /// Public base URL that content locators are built from
    #[cfg_attr(
        feature = "config",
        arg(
            long = "store-public-url",
            env = "STORE_PUBLIC_URL",
            default_value = DEFAULT_PUBLIC_BASE_URL
        )
    )]
    #[serde(default = "default_public_base_url")]
    pub store_public_url: String,
}

fn default_root() -> String {
    "./submittal-data".to_owned()
}

fn default_public_base_url() -> String {
    DEFAULT_PUBLIC_BASE_URL.to_owned()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            store_backend: BackendType::default(),
            store_root: default_root(),
            store_public_url: default_public_base_url(),
        }
    }
}

impl StoreConfig {
    /// Creates an in-memory configuration.
    pub fn memory() -> Self {
        Self {
            store_backend: BackendType::Memory,
            ..Default::default()
        }
    }

    /// Creates a filesystem configuration rooted at `root`.
    pub fn fs(root: impl Into<String>) -> Self {
        Self {
            store_backend: BackendType::Fs,
            store_root: root.into(),
            ..Default::default()
        }
    }

    /// Sets the public base URL.
    #[must_use]
    pub fn with_public_url(mut self, url: impl Into<String>) -> Self {
        self.store_public_url = url.into();
        self
    }

    /// Parses the public base URL, guaranteeing a trailing slash so that
    /// joined storage paths append instead of replacing the last segment.
    pub fn public_base_url(&self) -> StoreResult<Url> {
        let mut url = Url::parse(&self.store_public_url).map_err(|e| {
            StoreError::invalid_input(format!(
                "invalid public URL '{}': {e}",
                self.store_public_url
            ))
        })?;

        if url.cannot_be_a_base() {
            return Err(StoreError::invalid_input(format!(
                "public URL '{}' cannot be a base",
                self.store_public_url
            )));
        }

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(url)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> StoreResult<()> {
        if self.store_backend == BackendType::Fs && self.store_root.trim().is_empty() {
            return Err(StoreError::invalid_input(
                "filesystem backend requires a non-empty root",
            ));
        }

        self.public_base_url().map(|_| ())
    }
}
