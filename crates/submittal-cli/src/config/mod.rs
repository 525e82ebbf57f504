//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── renderer: RendererConfig    # Renderer URL, timeout, user agent
//! ├── store: StoreConfig          # Storage backend, root, public URL
//! ├── assembler: AssemblerConfig  # Per-document fetch deadline
//! ├── presenter: PresenterConfig  # Download directory, preview release delay
//! └── command: Command            # What to do
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.

mod provider;

use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand};
pub use provider::{Services, create_services};
use submittal_packet::AssemblerConfig;
use submittal_present::PresenterConfig;
use submittal_reqwest::RendererConfig;
use submittal_store::StoreConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::command::{AssembleArgs, CatalogArgs, DeleteArgs, UpdateArgs, UploadArgs};
use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "submittal")]
#[command(about = "Assemble PDF submittal packets from stored documents")]
#[command(version)]
pub struct Cli {
    /// Remote renderer connection.
    #[clap(flatten)]
    pub renderer: RendererConfig,

    /// Document storage.
    #[clap(flatten)]
    pub store: StoreConfig,

    /// Packet assembly limits.
    #[clap(flatten)]
    pub assembler: AssemblerConfig,

    /// Preview and download behavior.
    #[clap(flatten)]
    pub presenter: PresenterConfig,

    #[command(subcommand)]
    pub command: Command,
}

/// Operations exposed by the CLI.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Assemble a packet, then preview or save it
    Assemble(AssembleArgs),
    /// Store a new PDF document
    Upload(UploadArgs),
    /// Change metadata of a stored document
    Update(UpdateArgs),
    /// List the documents available for a product type
    Catalog(CatalogArgs),
    /// Delete a document and its content
    Delete(DeleteArgs),
    /// Report renderer and store health
    Health,
}

impl Command {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Assemble(_) => "assemble",
            Self::Upload(_) => "upload",
            Self::Update(_) => "update",
            Self::Catalog(_) => "catalog",
            Self::Delete(_) => "delete",
            Self::Health => "health",
        }
    }
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// The .env file is loaded before clap parses arguments, so its values
    /// act as defaults for the `env` fallbacks.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.renderer
            .validate()
            .context("invalid renderer configuration")?;
        self.store
            .validate()
            .context("invalid store configuration")?;
        self.presenter
            .validate()
            .with_context(|| {
                format!(
                    "invalid download directory {}",
                    self.presenter.download_dir.display()
                )
            })?;
        Ok(())
    }

    /// Logs configuration at debug level.
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );

        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            renderer_url = %self.renderer.renderer_url,
            renderer_timeout_secs = self.renderer.effective_timeout().as_secs(),
            store_backend = %self.store.store_backend,
            store_root = %self.store.store_root,
            fetch_timeout_secs = self.assembler.effective_fetch_timeout().as_secs(),
            download_dir = %self.presenter.download_dir.display(),
            "Configuration"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}
