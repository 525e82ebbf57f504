#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod error;
mod presenter;
mod viewer;

pub use config::{DEFAULT_RELEASE_DELAY_MS, PresenterConfig};
pub use error::{PresentationError, Result};
pub use presenter::{ArtifactPresenter, Preview, PreviewMode};
pub use viewer::{SystemViewer, Viewer};

/// Tracing target for presentation operations.
pub const TRACING_TARGET: &str = "submittal_present";
