//! # Storage Layer
//!
//! Everything that reads files.
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Problem | Line-oriented text (`N`, `K`, `A` lines) | any path |
//! | Config | TOML | `--config`, `./dayplan.toml`, or the platform config dir |
//!
//! ## Key Types
//!
//! - [`ProblemFile`] - A task graph plus the channel count and capacity it names
//! - [`Config`] - Search and output defaults

mod config;
mod loader;

pub use config::{Config, ConfigError, OutputConfig, OutputFormat, SearchConfig, LOCAL_CONFIG};
pub use loader::{parse, LoadError, ProblemFile};
