//! CLI argument parsing using clap.

use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use std::path::PathBuf;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Scope hints for JavaScript documents
#[derive(Parser)]
#[command(
    name = "scopehint",
    version = env!("CARGO_PKG_VERSION"),
    about = "Scope hints for JavaScript documents",
    long_about = "Parse JavaScript, repairing damaged lines on request, and index its hint tokens.",
    next_line_help = true,
    styles = clap_cargo_style()
)]
pub struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize project
    #[command(about = "Set up .scopehint directory with default configuration")]
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Analyze one file
    #[command(about = "Analyze a JavaScript file and print the response as JSON")]
    Analyze {
        /// File to analyze
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Blank faulting lines and retry when the file does not parse
        #[arg(short, long)]
        force: bool,

        /// Pretty-print the JSON response
        #[arg(long)]
        pretty: bool,
    },

    /// Serve analysis requests
    #[command(about = "Read JSON-lines requests on stdin, write responses on stdout")]
    Serve,

    /// Show configuration
    #[command(about = "Display active settings")]
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_analyze_flags() {
        let cli = Cli::try_parse_from(["scopehint", "analyze", "app.js", "--force"]).unwrap();
        match cli.command {
            Commands::Analyze { path, force, pretty } => {
                assert_eq!(path, PathBuf::from("app.js"));
                assert!(force);
                assert!(!pretty);
            }
            _ => panic!("expected analyze"),
        }
    }
}
