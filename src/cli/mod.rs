//! CLI module
//!
//! Command-line interface for paging through triples.
//!
//! # Commands
//!
//! - `triples` - Print matching triples (N-Triples or JSON lines)
//! - `count` - Count matching records without building triples

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
