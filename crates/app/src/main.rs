//! Globenv - Main Entry Point
//!
//! Command line host for the publishing pipeline: loads settings, wires the
//! JSON store, the process environment and a console build log into
//! [`GlobalVariablesPublisher`].

mod settings;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use globenv_application::GlobalVariablesPublisher;
use globenv_infrastructure::{
    ConsoleBuildLog, FileGlobalConfiguration, ProcessEnvironment, StaticEnvironment,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use settings::Settings;

/// Publish resolved variables into a global store.
#[derive(Debug, Parser)]
#[command(name = "globenv", version, about)]
struct Cli {
    /// Settings file (TOML, YAML or JSON).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Global configuration document to update.
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve variable text and merge it into the global store.
    Publish {
        /// Variable text, one `key=value` per line.
        #[arg(long, conflicts_with = "variables_file")]
        variables: Option<String>,

        /// File holding the variable text.
        #[arg(long)]
        variables_file: Option<PathBuf>,
    },

    /// Print the global store as `key=value` lines.
    Show,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut settings = Settings::load(cli.config.as_deref()).context("failed to load settings")?;
    if let Some(store) = cli.store {
        settings.store = store;
    }

    match cli.command {
        Command::Publish {
            variables,
            variables_file,
        } => {
            if let Some(text) = variables {
                settings.set_variables_text(text);
            } else if let Some(path) = variables_file {
                settings.set_variables_file(path);
            }
            publish(&settings)
        }
        Command::Show => show(&settings),
    }
}

fn publish(settings: &Settings) -> anyhow::Result<()> {
    let text = settings
        .read_variables_text()
        .context("failed to read variables file")?
        .unwrap_or_default();

    let mut store = FileGlobalConfiguration::open(&settings.store)
        .with_context(|| format!("failed to open {}", settings.store.display()))?;
    let environment =
        StaticEnvironment::layered(&ProcessEnvironment::new(), store.configuration().store())?;

    let publisher = GlobalVariablesPublisher::new(text);
    let log = ConsoleBuildLog::new(io::stdout());
    publisher.perform(&environment, &mut store, &log)?;
    Ok(())
}

fn show(settings: &Settings) -> anyhow::Result<()> {
    let store = FileGlobalConfiguration::open(&settings.store)
        .with_context(|| format!("failed to open {}", settings.store.display()))?;

    if let Some(variables) = store.configuration().store() {
        for (name, value) in variables.iter() {
            println!("{name}={value}");
        }
    }
    Ok(())
}
