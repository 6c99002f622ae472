//! Maintenance CLI for the Hoshi bot.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use hoshi_core::config;

use commands::{run_db_build, run_get};

/// Top-level CLI for the Hoshi bot.
#[derive(Debug, Parser)]
#[command(name = "hoshi")]
#[command(about = "Hoshi: Discord bot maintenance commands", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Provision the bot database tables (idempotent).
    DbBuild,

    /// Fetch a URL through the request pipeline and print the payload.
    Get {
        /// Target URL.
        url: String,

        /// Narrow the JSON response down to this key.
        #[arg(long)]
        getter: Option<String>,

        /// Print the raw byte length instead of decoding JSON.
        #[arg(long)]
        bytes: bool,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::DbBuild => run_db_build(&cfg).await?,
            CliCommand::Get { url, getter, bytes } => run_get(&cfg, &url, getter, bytes).await?,
        }

        Ok(())
    }
}
