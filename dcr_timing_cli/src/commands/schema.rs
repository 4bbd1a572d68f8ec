//! Implementation of the `dcr-timing schema` command.

use anyhow::{Context, Result};

use super::mine::MineOptions;

/// Pretty-printed JSON schema of [`MineOptions`].
pub fn options_schema() -> Result<String> {
    let schema = schemars::schema_for!(MineOptions);
    serde_json::to_string_pretty(&schema).context("failed to serialize schema")
}

/// Run the schema command, printing to stdout.
pub fn run() -> Result<()> {
    println!("{}", options_schema()?);
    Ok(())
}
