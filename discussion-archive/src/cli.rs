///
/// This module implements the CLI interface for discussion-archive: command parsing,
/// config resolution and the user-visible summary line.
///
/// All business logic (fetching, archiving, rendering) lives in [`discussion-archive-core`].
///
/// ## How To Use
/// - Command line: `discussion-archive sync [--owner <owner>] [--name <repo>]`, or point
///   `--config` at a YAML file. Without either, the default repository is archived.
/// - Programmatic/integration use: call [`run`] with a constructed [`Cli`].
///
/// [`discussion-archive-core`]: ../../discussion-archive-core/
use crate::load_config::{resolve_config, Overrides};
use anyhow::Result;
use clap::{Parser, Subcommand};
use discussion_archive_core::download::GraphQlDownloader;
use discussion_archive_core::synchronise::synchronise;
use std::path::PathBuf;

/// CLI for discussion-archive: mirror discussions into a static Markdown archive.
#[derive(Parser)]
#[clap(
    name = "discussion-archive",
    version,
    about = "Mirror a repository's discussions into a Markdown archive, a wiki staging directory and a dashboard"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch all discussions and rebuild the archive and dashboard
    Sync {
        /// Path to the YAML config file
        #[clap(long)]
        config: Option<PathBuf>,
        /// Repository owner (overrides the config file, defaults to swiftdd)
        #[clap(long)]
        owner: Option<String>,
        /// Repository name (overrides the config file, defaults to Synapse)
        #[clap(long)]
        name: Option<String>,
        /// GraphQL endpoint (overrides the config file)
        #[clap(long)]
        endpoint: Option<String>,
        /// Directory the archive and dashboard are written to
        #[clap(long)]
        output_dir: Option<PathBuf>,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Sync {
            config,
            owner,
            name,
            endpoint,
            output_dir,
        } => {
            let overrides = Overrides {
                owner,
                name,
                endpoint,
                output_dir,
            };
            let config = resolve_config(config.as_deref(), overrides)?;
            tracing::info!(command = "sync", "Starting archive run");

            let downloader = GraphQlDownloader::new(config.download.clone());
            match synchronise(&config, &downloader).await {
                Ok(report) => {
                    tracing::info!(command = "sync", ?report, "Archive run complete");
                    for warning in &report.warnings {
                        tracing::warn!(command = "sync", %warning, "Archive run warning");
                    }
                    println!("Done. Processed {} nodes.", report.records_processed);
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(command = "sync", error = %e, "Archive run failed");
                    Err(anyhow::Error::new(e))
                }
            }
        }
    }
}
