//! CLI entrypoint for HireMate
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use hiremate_application::{ChatSession, ConversationLogger, TokenStore};
use hiremate_infrastructure::{
    ConfigLoader, FileConfig, FileTokenStore, HttpChatTransport, JsonlConversationLogger,
    StaticTokenStore,
};
use hiremate_presentation::{ChatRepl, Cli, serve_legacy_resume};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

fn init_logging(verbose: u8, file_dir: Option<&str>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    match file_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "hiremate.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(EnvFilter::new(level))
                .with(stderr_layer)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(writer),
                )
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(EnvFilter::new(level))
                .with(stderr_layer)
                .init();
            None
        }
    }
}

fn token_store(cli: &Cli, config: &FileConfig) -> Arc<dyn TokenStore> {
    if let Some(token) = cli.token.clone().or_else(|| config.auth.token.clone()) {
        return Arc::new(StaticTokenStore::new(Some(token)));
    }
    let path = config
        .auth
        .token_file
        .as_ref()
        .map(Into::into)
        .or_else(FileTokenStore::default_path);
    match path {
        Some(path) => Arc::new(FileTokenStore::new(path)),
        None => Arc::new(StaticTokenStore::new(None)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref()).context("failed to load configuration")?
    };

    let _log_guard = init_logging(cli.verbose, config.logging.file_dir.as_deref());
    info!("Starting HireMate");

    if let Some(base_url) = &cli.base_url {
        config.api.base_url = base_url.clone();
    }

    let issues = config.validate();
    for issue in &issues {
        warn!("Configuration: {}", issue);
    }

    // Legacy resume surface
    if cli.serve_legacy.is_some() {
        let addr: SocketAddr = match cli.legacy_bind() {
            Some(addr) => addr.context("invalid --serve-legacy address")?,
            None => config
                .server
                .bind
                .parse()
                .with_context(|| format!("invalid server.bind '{}'", config.server.bind))?,
        };
        serve_legacy_resume(addr).await?;
        return Ok(());
    }

    if !issues.is_empty() {
        bail!("configuration is invalid; see warnings above");
    }

    // === Dependency Injection ===
    let transport = Arc::new(HttpChatTransport::new(CONNECT_TIMEOUT)?);
    let mut session = ChatSession::new(
        transport,
        token_store(&cli, &config),
        config.to_client_config(),
    )?;

    if let Some(path) = &config.logging.conversation_log {
        match JsonlConversationLogger::open(path) {
            Ok(logger) => {
                let logger: Arc<dyn ConversationLogger> = Arc::new(logger);
                session = session.with_conversation_logger(logger);
            }
            Err(e) => warn!("Conversation log disabled ({}): {}", path, e),
        }
    }

    let stream = config.chat.stream && !cli.no_stream;
    let mut repl = ChatRepl::new(session)
        .with_stream(stream)
        .with_progress(!cli.quiet);

    // Chat mode
    if cli.chat {
        repl.run().await?;
        return Ok(());
    }

    // Single question mode - question is required
    let question = match cli.question {
        Some(q) if !q.trim().is_empty() => q,
        _ => bail!("Question is required. Use --chat for interactive mode."),
    };

    if repl.ask(&question).await.is_err() {
        std::process::exit(1);
    }

    Ok(())
}
