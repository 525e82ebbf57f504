#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod backend;
mod config;
mod error;

pub use backend::ObjectDocumentStore;
pub use config::{BackendType, DEFAULT_PUBLIC_BASE_URL, StoreConfig};

/// Tracing target for storage operations.
pub const TRACING_TARGET: &str = "submittal_store";
