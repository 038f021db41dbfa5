//! CLI for afetch.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use afetch_core::config::{self, AfetchConfig};
use std::path::{Path, PathBuf};

use commands::{run_checksum, run_completions, run_fetch, run_inspect, run_man};

/// Top-level CLI for afetch.
#[derive(Debug, Parser)]
#[command(name = "afetch", version)]
#[command(
    about = "Fetch a build artifact from ordered mirrors, validate it, and write it atomically",
    long_about = None
)]
pub struct Cli {
    /// Config file to use instead of ~/.config/afetch/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Try candidate URLs in order and write the first valid artifact.
    Fetch(FetchArgs),

    /// Check an artifact already on disk (size, leading bytes, validity, SHA-256).
    Inspect(InspectArgs),

    /// Compute SHA-256 of a file.
    Checksum {
        /// Path to the file.
        path: String,
    },

    /// Print shell completions.
    Completions {
        /// Target shell.
        shell: clap_complete::Shell,
    },

    /// Print the man page (roff).
    Man,
}

/// Validation knobs shared by `fetch` and `inspect`.
#[derive(Debug, Clone, Default, Args)]
pub struct PolicyArgs {
    /// Minimum plausible size in bytes; the artifact must be strictly larger.
    #[arg(long, value_name = "BYTES")]
    pub min_size: Option<u64>,

    /// Expected leading bytes as hex (default: 504b, the zip/jar signature).
    #[arg(long, value_name = "HEX")]
    pub signature: Option<String>,

    /// Expected SHA-256 of the artifact (hex).
    #[arg(long, value_name = "HEX")]
    pub sha256: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct FetchArgs {
    /// Candidate URLs (http, https, file) or local paths, most preferred first.
    #[arg(value_name = "URL")]
    pub urls: Vec<String>,

    /// Destination file. Missing parent directories are created.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Take URLs, destination and thresholds from a named [[artifacts]] entry of the config.
    #[arg(long, value_name = "NAME")]
    pub profile: Option<String>,

    #[command(flatten)]
    pub policy: PolicyArgs,

    /// If no candidate passes strict validation, accept the last one that is merely
    /// large enough. The result is reported as unverified.
    #[arg(long)]
    pub best_effort: bool,

    /// Redirect hop budget per candidate.
    #[arg(long, value_name = "N")]
    pub max_redirects: Option<u32>,

    /// Per-request timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// User-Agent header to send.
    #[arg(long, value_name = "UA")]
    pub user_agent: Option<String>,

    /// Keep the destination if it already exists and passes validation.
    #[arg(long)]
    pub skip_existing: bool,

    /// Exit 0 even when every candidate fails (the failure summary is still printed).
    #[arg(long)]
    pub no_fail: bool,

    /// Print the result as JSON instead of per-candidate lines.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct InspectArgs {
    /// File to inspect.
    pub path: PathBuf,

    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Print the inspection as JSON.
    #[arg(long)]
    pub json: bool,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Fetch(args) => {
                let cfg = load_config(cli.config.as_deref())?;
                tracing::debug!("loaded config: {:?}", cfg);
                run_fetch(&args, &cfg).await?;
            }
            CliCommand::Inspect(args) => {
                let cfg = load_config(cli.config.as_deref())?;
                run_inspect(&args, &cfg).await?;
            }
            CliCommand::Checksum { path } => run_checksum(Path::new(&path)).await?,
            CliCommand::Completions { shell } => run_completions(shell)?,
            CliCommand::Man => run_man()?,
        }

        Ok(())
    }
}

fn load_config(path: Option<&Path>) -> Result<AfetchConfig> {
    match path {
        Some(p) => config::load_from(p),
        None => config::load_or_init(),
    }
}

#[cfg(test)]
mod tests;
