//! Headless Pathfinder combat sheet.
//!
//! ```bash
//! pfchar sheet characters/yoyu.json
//! pfchar play characters/yoyu.json
//! ```

mod headless;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pfchar_core::{load_character, CombatSheet};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "pfchar", version, about = "Pathfinder combat statistics")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the combat sheet of each character definition
    Sheet {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Print the sheets as JSON
        #[arg(long)]
        json: bool,
    },
    /// Interactively toggle effects and manage statuses
    Play { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pfchar=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sheet { files, json } => {
            for (index, path) in files.iter().enumerate() {
                let character = load_character(path)
                    .await
                    .with_context(|| format!("Failed to load {}", path.display()))?;
                let sheet = CombatSheet::new(&character);
                if json {
                    println!("{}", serde_json::to_string_pretty(&sheet)?);
                } else {
                    if index > 0 {
                        println!();
                    }
                    println!("{sheet}");
                }
            }
        }
        Commands::Play { file } => {
            let character = load_character(&file)
                .await
                .with_context(|| format!("Failed to load {}", file.display()))?;
            headless::run(character)?;
        }
    }

    Ok(())
}
