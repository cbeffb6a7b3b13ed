//! `ultranote`: stream generated study notes to the terminal.
//!
//! ```bash
//! export ULTRANOTE_ENDPOINT=https://<project>.supabase.co/functions/v1/generate-notes
//! export ULTRANOTE_API_KEY=<publishable key>
//! ultranote --mode mcqs "The Krebs cycle"
//! ultranote --mode summarise --file chapter3.txt --output summary.html
//! ```

mod prompt;
mod sink;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;
use ultranote_client::config::{API_KEY_VAR, CONNECT_TIMEOUT_VAR, ENDPOINT_VAR};
use ultranote_client::{
    ClientConfig, ConfigError, GenerationOutcome, NotesClient, Orchestrator,
};
use ultranote_types::{GenerateError, Mode, SubmitError};

use crate::sink::TerminalSink;

/// Exit code for a run interrupted with Ctrl-C.
const EXIT_CANCELLED: u8 = 130;

/// Generate study notes from a prompt and stream them to stdout.
#[derive(Debug, Parser)]
#[command(name = "ultranote", version, about)]
struct Cli {
    /// Prompt text. Read from stdin when neither a prompt nor --file is given.
    prompt: Vec<String>,

    /// Generation mode: normal, important, mcqs or summarise.
    #[arg(short, long, default_value_t = Mode::Normal)]
    mode: Mode,

    /// Plain-text file whose contents are appended to the prompt.
    #[arg(short, long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Stream Source URL.
    #[arg(long, env = ENDPOINT_VAR)]
    endpoint: String,

    /// Bearer key for the Stream Source.
    #[arg(long, env = API_KEY_VAR, hide_env_values = true)]
    api_key: Option<String>,

    /// Give up connecting after this many seconds.
    #[arg(long, env = CONNECT_TIMEOUT_VAR, value_name = "SECS")]
    connect_timeout_secs: Option<u64>,

    /// Also write the finished notes to this file.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {what}: {source}")]
    Read {
        what: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Submit(#[from] SubmitError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let prompt = read_prompt(&cli).await?;

    let mut config = ClientConfig::new(cli.endpoint.clone());
    if let Some(key) = &cli.api_key {
        config = config.api_key(key.clone());
    }
    if let Some(secs) = cli.connect_timeout_secs {
        config = config.connect_timeout(Duration::from_secs(secs));
    }
    let client = NotesClient::from_config(&config)?;

    let sink = Arc::new(TerminalSink::new(std::io::stdout()));
    let orchestrator = Orchestrator::new(client, sink.clone());

    let generation = orchestrator.submit(prompt, cli.mode)?;
    let cancel = generation.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    match generation.wait().await? {
        GenerationOutcome::Completed { increments } => {
            tracing::info!(increments, "notes generated");
            if let Some(path) = &cli.output {
                tokio::fs::write(path, sink.text())
                    .await
                    .map_err(|source| CliError::Write {
                        path: path.display().to_string(),
                        source,
                    })?;
            }
            Ok(ExitCode::SUCCESS)
        }
        GenerationOutcome::Cancelled => {
            eprintln!("cancelled");
            Ok(ExitCode::from(EXIT_CANCELLED))
        }
    }
}

async fn read_prompt(cli: &Cli) -> Result<String, CliError> {
    let file_text = match &cli.file {
        Some(path) => Some(tokio::fs::read_to_string(path).await.map_err(|source| {
            CliError::Read {
                what: path.display().to_string(),
                source,
            }
        })?),
        None => None,
    };

    if let Some(prompt) = prompt::compose(&cli.prompt, file_text.as_deref()) {
        return Ok(prompt);
    }

    let mut stdin_text = String::new();
    tokio::io::stdin()
        .read_to_string(&mut stdin_text)
        .await
        .map_err(|source| CliError::Read {
            what: "stdin".into(),
            source,
        })?;
    Ok(stdin_text)
}
