use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use dcr_timing_cli::commands::{mine, schema};
use dcr_timing_cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    match &cli.command {
        Some(Commands::Mine {
            log,
            model,
            output,
            options,
        }) => {
            let options = mine::MineOptions::load(options.as_deref())?;
            mine::run(log, model, output, &options)?;
        }
        Some(Commands::Schema) => schema::run()?,
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
