//! CLI entry point for `email-json-extract`.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use email_json_extract::{Config, ErrorKind, ExtractError, JsonExtractor, SourceDescriptor};

/// Find the JSON payload attached to or linked from an email
#[derive(Parser)]
#[command(name = "email-json-extract", version)]
struct Cli {
    /// Raw email file (.eml)
    #[arg(short, long, value_name = "FILE")]
    path: Option<String>,

    /// URL serving the raw email
    #[arg(short, long, value_name = "URL")]
    url: Option<String>,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE", env = "EMAIL_JSON_EXTRACT_CONFIG")]
    config: Option<PathBuf>,

    /// Override the per-fetch timeout in milliseconds
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Print the strategy and location along with the value
    #[arg(long)]
    with_source: bool,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            exit_code(&err)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(ms) = cli.timeout_ms {
        if ms == 0 {
            let err = ExtractError::BadInput("--timeout-ms must be greater than zero".into());
            return Err(err.into());
        }
        config.fetch_timeout_ms = ms;
    }

    init_logging(&config, cli.verbose);

    let descriptor = SourceDescriptor::from_params(cli.path.as_deref(), cli.url.as_deref())?;
    let extractor = JsonExtractor::new(config)?;
    let extraction = extractor.extract(&descriptor).await?;

    let output = if cli.with_source {
        serde_json::to_string_pretty(&extraction)
    } else {
        serde_json::to_string_pretty(&extraction.value)
    }
    .context("failed to serialize result")?;
    println!("{output}");

    Ok(())
}

fn exit_code(err: &anyhow::Error) -> ExitCode {
    let code = match err.downcast_ref::<ExtractError>().map(ExtractError::kind) {
        Some(ErrorKind::NotFound) => 1,
        Some(ErrorKind::BadInput) | None => 2,
        Some(ErrorKind::FetchError | ErrorKind::ReadError) => 3,
        Some(ErrorKind::ParseError) => 4,
    };
    ExitCode::from(code)
}

/// Initialize tracing to stderr; stdout carries only the result.
fn init_logging(config: &Config, verbose: u8) {
    let level = match verbose {
        0 => config.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
