//! CLI for recu.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use recu_core::config::DEFAULT_CONFIG_FILE;
use recu_core::store::ConfigStore;
use std::path::PathBuf;

use commands::{run_add, run_batch, run_init, run_scrape, run_status};

/// Top-level CLI for recu.
#[derive(Debug, Parser)]
#[command(name = "recu")]
#[command(about = "Resumable playlist downloader with a JSON task file", long_about = None)]
pub struct Cli {
    /// Task file (urls + request headers).
    #[arg(long, short, global = true, default_value = DEFAULT_CONFIG_FILE, value_name = "PATH")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Write a blank task file template if none exists.
    Init,

    /// Add a play URL to the task file.
    Add {
        /// Play page URL.
        url: String,
        /// Only capture part of the video: start and end percent, plus the extra clip value.
        #[arg(long, num_args = 3, value_names = ["START", "END", "EXTRA"], allow_negative_numbers = true)]
        trim: Option<Vec<f64>>,
    },

    /// Show every task and its progress.
    Status,

    /// Download every unfinished task, in order.
    Run {
        /// Directory for finished videos (default: current directory).
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },

    /// Scrape a listing page for play links and add the new ones.
    Scrape {
        /// Listing page URL, e.g. https://host/<name>/...
        page_url: String,
    },
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let store = ConfigStore::new(&cli.config);
        tracing::debug!(path = %store.path().display(), "using task file");

        match cli.command {
            CliCommand::Init => run_init(&store)?,
            CliCommand::Add { url, trim } => run_add(&store, &url, trim.as_deref())?,
            CliCommand::Status => run_status(&store)?,
            CliCommand::Run { output_dir } => {
                let output_dir = match output_dir {
                    Some(dir) => dir,
                    None => std::env::current_dir()?,
                };
                run_batch(&store, &output_dir)?;
            }
            CliCommand::Scrape { page_url } => run_scrape(&store, &page_url)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
