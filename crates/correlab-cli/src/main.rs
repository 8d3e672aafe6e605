//! correlab CLI: the terminal host for the correlation engine and games.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use correlab_core::CoreError;

mod commands;
mod render;

#[derive(Parser)]
#[command(
    name = "correlab",
    version,
    about = "Correlation and regression practice in the terminal"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute correlation and regression over a dataset
    Analyze {
        /// Path to .toml catalog file or directory
        #[arg(long, default_value = "./catalog")]
        catalog: PathBuf,

        /// Dataset id
        #[arg(long)]
        dataset: String,

        /// Explanatory column key
        #[arg(long, requires = "y")]
        x: Option<String>,

        /// Response column key
        #[arg(long, requires = "x")]
        y: Option<String>,

        /// Predict the response at this value of x
        #[arg(long, requires = "x", allow_negative_numbers = true)]
        predict: Option<f64>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Validate catalog TOML files
    Validate {
        /// Path to catalog file or directory
        #[arg(long, default_value = "./catalog")]
        catalog: PathBuf,
    },

    /// Play the guess-the-correlation game
    Play {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Seed for repeatable rounds
        #[arg(long)]
        seed: Option<u64>,

        /// Number of scored rounds
        #[arg(long)]
        rounds: Option<u32>,

        /// Skip the practice round
        #[arg(long)]
        no_practice: bool,

        /// Write a JSON report of the finished game to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Work through the catalog's quests
    Quest {
        /// Path to catalog file or directory
        #[arg(long, default_value = "./catalog")]
        catalog: PathBuf,

        /// Only the quests for this dataset
        #[arg(long)]
        dataset: Option<String>,
    },

    /// Create starter config and example catalog
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("correlab=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze {
            catalog,
            dataset,
            x,
            y,
            predict,
            format,
        } => commands::analyze::execute(catalog, dataset, x.zip(y), predict, format),
        Commands::Validate { catalog } => commands::validate::execute(catalog),
        Commands::Play {
            config,
            seed,
            rounds,
            no_practice,
            report,
        } => commands::play::execute(config, seed, rounds, no_practice, report),
        Commands::Quest { catalog, dataset } => commands::quest::execute(catalog, dataset),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        if let Some(hint) = error_hint(&e) {
            eprintln!("{hint}");
        }
        process::exit(1);
    }
}

/// Extra guidance for errors caused by malformed catalog data.
fn error_hint(err: &anyhow::Error) -> Option<&'static str> {
    let core = err.chain().find_map(|e| e.downcast_ref::<CoreError>())?;
    core.is_catalog_error()
        .then_some("hint: the catalog data is malformed; fix it and re-run `correlab validate`")
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn hint_for_catalog_errors() {
        let err = Err::<(), _>(CoreError::EmptyDataset("students".into()))
            .context("invalid catalog: catalog")
            .unwrap_err();
        assert!(error_hint(&err).is_some());
    }

    #[test]
    fn no_hint_for_lookups() {
        let err = anyhow::Error::new(CoreError::UnknownDataset("penguins".into()));
        assert!(error_hint(&err).is_none());
        assert!(error_hint(&anyhow::anyhow!("io failure")).is_none());
    }
}
