use std::path::PathBuf;

use clap::{Parser, Subcommand};
use foundation::FloorId;
use scene::Feature;
use serde::Serialize;
use tools::{ScriptStep, button_layout, load_config, read_json, replay, style_document};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Indoor floor overlay style and replay tool")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the indoor source and per-floor layers as JSON
    Style {
        /// Controller config (JSON); built-in defaults when omitted
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the floor toggle buttons
    Buttons {
        #[arg(long)]
        config: Option<PathBuf>,

        /// Focused floor; all floors are shown when omitted
        #[arg(long, allow_hyphen_values = true)]
        floor: Option<i32>,
    },

    /// Replay a scripted session and print the renderer command log
    Replay {
        #[arg(long)]
        config: Option<PathBuf>,

        /// JSON array of loaded floorplan features
        #[arg(long)]
        features: PathBuf,

        /// JSON array of script steps
        #[arg(long)]
        script: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = run(Args::parse()) {
        error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        Command::Style { config } => {
            let config = load_config(config.as_deref())?;
            print_json(&style_document(&config)?)
        }
        Command::Buttons { config, floor } => {
            let config = load_config(config.as_deref())?;
            print_json(&button_layout(&config, floor.map(FloorId))?)
        }
        Command::Replay {
            config,
            features,
            script,
        } => {
            let config = load_config(config.as_deref())?;
            let features: Vec<Feature> = read_json(&features)?;
            let steps: Vec<ScriptStep> = read_json(&script)?;
            info!("replaying {} steps over {} features", steps.len(), features.len());
            print_json(&replay(config, features, &steps)?)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
