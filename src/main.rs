mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use traits_matcher::personality::analyze::Combine;
use traits_matcher::{config, db, error, personality, server};

#[derive(Parser)]
#[command(name = "traits-matcher", version, about = "Personality matching MCP server")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the MCP server (transport from config, stdio by default)
    Serve {
        /// Serve Streamable HTTP instead of stdio
        #[arg(long)]
        http: bool,
    },
    /// Rank stored persons against a job description
    Match {
        /// Company the job belongs to
        #[arg(long, default_value = "unnamed")]
        company: String,
        /// Only show the closest N persons
        #[arg(long)]
        limit: Option<usize>,
        /// Override the configured combination rule (sum or mean)
        #[arg(long)]
        combine: Option<Combine>,
        /// Job description text
        job_description: String,
    },
    /// Export all persons and traits as JSON to stdout
    Export,
    /// Import persons and traits from a JSON export file
    Import {
        /// Path to the export file
        file: PathBuf,
    },
    /// Check both stores and print a health report
    Doctor,
    /// Delete all persons and traits
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = config::MatcherConfig::load()?;

    // Log to stderr so stdout stays clean for MCP JSON-RPC.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve { http } => {
            if http {
                config.server.transport = "http".into();
            }
            server::serve(config).await?;
        }
        Command::Match {
            company,
            limit,
            combine,
            job_description,
        } => {
            if let Some(rule) = combine {
                config.scoring.combine = rule;
            }
            cli::rank::rank(&config, &company, &job_description, limit)?
        }
        Command::Export => cli::export::export(&config)?,
        Command::Import { file } => cli::import::import(&config, &file)?,
        Command::Doctor => cli::doctor::doctor(&config)?,
        Command::Reset => cli::reset::reset(&config)?,
    }

    Ok(())
}
