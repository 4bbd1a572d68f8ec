//! Command line interface for mining DCR delays and deadlines.

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands};
