//! `doc-retrieval` - interactive documentation retrieval over an MCP tool backend.
//!
//! ```text
//! doc-retrieval --script path/to/server.py
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use thiserror::Error;
use tracing::{error, info};

use doc_retrieval::adapters::ai::{AnthropicConfig, AnthropicProvider};
use doc_retrieval::adapters::console::{spawn_stdin_reader, ConsolePresenter};
use doc_retrieval::adapters::mcp::{ProcessLauncher, StdioTimeouts};
use doc_retrieval::application::{
    InteractiveLoop, LoopSettings, LoopSummary, ReasoningDispatcher, ToolBackendSession,
};
use doc_retrieval::config::{AppConfig, ConfigError, ValidationError, ANTHROPIC_API_KEY_ENV};
use doc_retrieval::domain::foundation::ConnectionError;
use doc_retrieval::ports::{AIError, ClientInfo, RetrievalPresenter};

/// Command-line options. Each one overrides the matching config value.
#[derive(Parser, Debug)]
#[command(name = "doc-retrieval", version)]
#[command(about = "Retrieve documentation references through an MCP tool backend")]
struct Cli {
    /// Backend script to launch (must be a .py file)
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Interpreter used to run the backend script
    #[arg(long)]
    interpreter: Option<String>,

    /// Reasoning model identifier
    #[arg(short, long)]
    model: Option<String>,

    /// Token budget per model call
    #[arg(long)]
    max_tokens: Option<u32>,

    /// Remove repeated references from each result
    #[arg(long)]
    dedupe: bool,

    /// Only print results and errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(script) = &self.script {
            config.backend.script_path = Some(script.clone());
        }
        if let Some(interpreter) = &self.interpreter {
            config.backend.interpreter = interpreter.clone();
        }
        if let Some(model) = &self.model {
            config.ai.model = model.clone();
        }
        if let Some(max_tokens) = self.max_tokens {
            config.ai.max_tokens = max_tokens;
        }
        if self.dedupe {
            config.retrieval.dedupe_references = true;
        }
    }
}

/// Anything that stops the client before the loop starts.
#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("failed to create model client: {0}")]
    Provider(#[from] AIError),

    #[error(transparent)]
    Connection(#[from] ConnectionError),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; stdout is the operator channel.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("doc_retrieval=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(summary) => {
            info!(
                queries = summary.queries,
                failures = summary.failures,
                "Session finished"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "Startup failed");
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<LoopSummary, StartupError> {
    let mut config = AppConfig::load()?;
    cli.apply(&mut config);
    config.validate()?;

    let api_key = config
        .ai
        .anthropic_api_key
        .clone()
        .ok_or(ValidationError::MissingRequired(ANTHROPIC_API_KEY_ENV))?;
    let provider = AnthropicProvider::new(
        AnthropicConfig::from_secret(api_key)
            .with_model(config.ai.model.clone())
            .with_base_url(config.ai.base_url.clone())
            .with_timeout(config.ai.timeout()),
    )?;

    let presenter: Arc<dyn RetrievalPresenter> = if cli.quiet {
        Arc::new(ConsolePresenter::stdout().quiet())
    } else {
        Arc::new(ConsolePresenter::stdout())
    };

    let launcher = ProcessLauncher::new(StdioTimeouts {
        request: config.backend.request_timeout(),
        shutdown: config.backend.shutdown_timeout(),
    });
    let client = ClientInfo::new(
        config.backend.client_name.clone(),
        config.backend.client_version.clone(),
    );
    let session =
        ToolBackendSession::connect(&launcher, config.backend.launch_spec()?, &client).await?;

    let dispatcher = ReasoningDispatcher::new(Arc::new(provider), config.ai.max_tokens);
    let settings = LoopSettings {
        quit_sentinel: config.retrieval.quit_sentinel.clone(),
        dedupe_references: config.retrieval.dedupe_references,
        refresh_catalog_per_query: config.retrieval.refresh_catalog_per_query,
    };

    let interactive = InteractiveLoop::new(
        session,
        dispatcher,
        presenter,
        spawn_stdin_reader(),
        settings,
    );

    Ok(interactive.run().await)
}
