//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Commands
//!
//! | Command | Question answered |
//! |---------|-------------------|
//! | `enumerate` | Which schedules finish within D days? |
//! | `earliest` | What is the earliest day everything is done? |
//! | `compare` | How do the strategies compare on one query? |
//! | `min-capacity` | What capacity per channel meets the deadline? |
//! | `min-cost` | Which even/odd capacity pair is cheapest for the deadline? |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for progress lines and debug logs:
//! ```bash
//! dayplan --verbose earliest problem.txt --capacity 3
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod plan;
mod optimize;

pub use app::{run, CapacityArgs, Cli, Commands, EnumerationStrategy, SearchArgs};
pub use output::{Output, OutputFormat};
