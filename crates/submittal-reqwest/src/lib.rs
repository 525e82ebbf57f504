#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod client;
mod config;
mod error;

pub use crate::client::ReqwestRenderer;
pub use crate::config::{DEFAULT_RENDERER_URL, DEFAULT_TIMEOUT_SECS, RendererConfig};
pub use crate::error::{Error, Result};

/// Tracing target for renderer client operations.
pub const TRACING_TARGET: &str = "submittal_reqwest";
