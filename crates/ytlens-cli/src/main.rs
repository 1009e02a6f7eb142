mod channel;
mod comments;
mod resolve;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use ytlens_core::AppConfig;
use ytlens_export::ExportError;
use ytlens_youtube::{YoutubeClient, YoutubeError};

#[derive(Debug, Parser)]
#[command(name = "ytlens")]
#[command(about = "YouTube channel statistics and comment extraction")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve a URL, handle, or ID to a canonical channel or video ID
    Resolve {
        /// Channel or video URL, `@handle`, or bare ID
        input: String,
    },
    /// Show statistics for a channel
    Channel {
        /// Channel URL, `@handle`, channel ID, or a video whose uploader to show
        input: String,
        /// Print exact subscriber counts instead of abbreviations
        #[arg(long)]
        exact: bool,
    },
    /// Extract comments from a video
    Comments {
        /// Video URL or ID
        input: String,
        /// Maximum comments to collect (0 collects everything)
        #[arg(long, default_value_t = 0)]
        max: usize,
        /// Only collect top-level comments
        #[arg(long)]
        no_replies: bool,
        /// Write comments to this CSV file
        #[arg(long, conflicts_with = "csv_dir")]
        csv: Option<PathBuf>,
        /// Write comments to a CSV file named after the video in this directory
        #[arg(long)]
        csv_dir: Option<PathBuf>,
        /// Upload comments to the configured Airtable table
        #[arg(long)]
        airtable: bool,
        /// Number of comments to print as a preview
        #[arg(long, default_value_t = 10)]
        preview: usize,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", user_message(&err));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ytlens_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let client = build_client(&config)?;

    match cli.command {
        Commands::Resolve { input } => resolve::run_resolve(&client, &input).await,
        Commands::Channel { input, exact } => channel::run_channel(&client, &input, exact).await,
        Commands::Comments {
            input,
            max,
            no_replies,
            csv,
            csv_dir,
            airtable,
            preview,
        } => {
            let args = comments::CommentsArgs {
                input,
                max_results: (max > 0).then_some(max),
                include_replies: !no_replies,
                csv,
                csv_dir,
                airtable,
                preview,
            };
            comments::run_comments(&client, &config, &args).await
        }
    }
}

fn build_client(config: &AppConfig) -> Result<YoutubeClient, YoutubeError> {
    YoutubeClient::with_base_url(
        &config.youtube_api_key,
        config.request_timeout_secs,
        &config.user_agent,
        &config.youtube_api_base_url,
    )
}

/// Turns any error reaching `main` into one line for stderr.
fn user_message(err: &anyhow::Error) -> String {
    if let Some(yt) = err.downcast_ref::<YoutubeError>() {
        return yt.user_message();
    }
    if let Some(export) = err.downcast_ref::<ExportError>() {
        return export.to_string();
    }
    format!("{err:#}")
}
