use clap::Parser;

use scopehint::Settings;
use scopehint::cli::commands::{analyze, init, serve};
use scopehint::cli::{Cli, Commands};
use scopehint::logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Init { force } = cli.command {
        return init::run_init(force);
    }

    let loaded = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    let config = loaded.unwrap_or_else(|e| {
        eprintln!("Configuration error: {e}");
        Settings::default()
    });

    logging::init_with_config(&config.logging);

    match cli.command {
        Commands::Init { .. } => Ok(()),
        Commands::Analyze {
            path,
            force,
            pretty,
        } => analyze::run(&path, force, pretty, &config),
        Commands::Serve => serve::run(&config),
        Commands::Config => init::run_config(&config),
    }
}
