//! Subcommand implementations.

pub mod mine;
pub mod schema;
