#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod assembler;
mod config;
mod encoder;

pub use assembler::PacketAssembler;
pub use config::{AssemblerConfig, DEFAULT_FETCH_TIMEOUT_SECS};
pub use encoder::DocumentEncoder;

/// Tracing target for packet assembly.
pub const TRACING_TARGET: &str = "submittal_packet";
