use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "velox", version, about = "Velox CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the descriptor tree of a JSON render description and print it.
    Render {
        /// Path to the .json description
        input: PathBuf,
        /// Platform config overlay (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Suppress advisory diagnostics
        #[arg(long)]
        production: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Render {
            input,
            config,
            production,
        } => {
            let tree = velox_cli::render_file(&input, config.as_deref(), production)?;
            print!("{tree}");
        }
    }
    Ok(())
}
