use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

// Use the library modules
use toolup::commands;

#[derive(Parser)]
#[clap(name = "toolup")]
#[clap(about = "Installer for pre-built developer tool releases")]
#[clap(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install a tool from its release archive
    Install {
        /// Tool name as listed in the catalog
        tool: String,
        /// Destination directory (defaults to the configured bin directory)
        #[clap(long)]
        path: Option<PathBuf>,
        /// Build from source with the Go toolchain instead of downloading
        #[clap(long)]
        source: bool,
    },
    /// Report requirement status for a tool
    Check {
        /// Tool name as listed in the catalog
        tool: String,
    },
    /// List catalog tools and their installed state
    List,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Install { tool, path, source } => {
            commands::install::install_tool(&tool, path.as_deref(), source)
                .map_err(|e| anyhow::anyhow!(e))
        }
        Commands::Check { tool } => {
            commands::check::check_tool(&tool).map_err(|e| anyhow::anyhow!(e))
        }
        Commands::List => commands::list::list_tools().map_err(|e| anyhow::anyhow!(e)),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    Ok(())
}
