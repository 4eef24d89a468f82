mod session;

use std::path::PathBuf;

use anyhow::Context;
use blackjack_drivers::{parse_config_from_file, resolve_config_path, DEFAULT_CONFIG_PATH};
use blackjack_rl::TrainingConfig;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, about, long_about = None)]
struct CommandLineArgs {
    /// The path of the config file
    #[arg(short, long, default_value_t = String::from(DEFAULT_CONFIG_PATH))]
    config: String,

    /// Overrides the number of training episodes of the config file
    #[arg(short, long)]
    episodes: Option<u64>,

    /// Seed of the random source, for reproducible runs. Parallel comparison
    /// runs use seed, seed + 1, ...
    #[arg(short, long)]
    seed: Option<u64>,

    /// Writes the learned policy table to this path as YAML
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Answers hit/stand questions from stdin while training runs
    #[arg(short, long)]
    interactive: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = CommandLineArgs::parse();
    let config_path = resolve_config_path(&args.config)?;
    let config = parse_config_from_file(&config_path)?;

    let training: Result<TrainingConfig, _> = config.training.clone().try_into();
    let mut training = training.context("Invalid training section")?;
    if let Some(episodes) = args.episodes {
        training.episodes = episodes;
    }

    let policy = if args.interactive {
        session::advise_while_training(training, args.seed)?
    } else if config.trainer.compare_draw_variants {
        session::compare_draw_variants(training, &config.trainer, args.seed)?
    } else {
        session::train_and_report(training, &config.trainer, args.seed)?
    };

    if let Some(output) = args.output {
        let content = serde_yaml::to_string(&policy)?;
        std::fs::write(&output, content)
            .with_context(|| format!("Cannot write policy to {}", output.display()))?;
        println!("Policy written to {}", output.display());
    }

    Ok(())
}
