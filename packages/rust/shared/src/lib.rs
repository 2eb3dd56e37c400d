//! Shared types, error model, and configuration for bottleneck.
//!
//! This crate is the foundation depended on by all other bottleneck crates.
//! It provides:
//! - [`BottleneckError`], the unified error type
//! - The record model ([`Record`], [`Marker`], [`ParseFailure`], [`ParseResult`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, LatexConfig, config_dir, config_file_path, expand_home,
    init_config, load_config, load_config_from, render_config,
};
pub use error::{BottleneckError, Result};
pub use types::{FailureReason, Marker, ParseFailure, ParseResult, Record, RecordId};
