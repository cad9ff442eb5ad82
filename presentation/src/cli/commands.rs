//! CLI command definitions

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// CLI arguments for hiremate
#[derive(Parser, Debug)]
#[command(name = "hiremate")]
#[command(author, version, about = "HireMate - AI interview coach in your terminal")]
#[command(long_about = r#"
HireMate connects to the HireMate backend and lets you practise interview
questions with an AI coach. Answers stream in as they are generated; if the
backend cannot be reached a built-in coaching tip is shown instead.

Configuration files are loaded from (in priority order):
1. HIREMATE_* environment variables (e.g. HIREMATE_API__BASE_URL)
2. --config <path>       Explicit config file
3. ./hiremate.toml       Project-level config
4. ~/.config/hiremate/config.toml   Global config

Example:
  hiremate "How should I answer 'tell me about yourself'?"
  hiremate --chat --base-url http://localhost:5000
  hiremate --serve-legacy 127.0.0.1:5001
"#)]
pub struct Cli {
    /// The question to ask (not required in chat mode)
    pub question: Option<String>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Use the single-request endpoint instead of streaming
    #[arg(long)]
    pub no_stream: bool,

    /// Backend base URL (overrides configuration)
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Bearer token (overrides the stored token)
    #[arg(long, value_name = "TOKEN", env = "HIREMATE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Serve the deprecated resume endpoints (answering 410 Gone) on ADDR
    #[arg(long, value_name = "ADDR", num_args = 0..=1, default_missing_value = "")]
    pub serve_legacy: Option<String>,
}

impl Cli {
    /// Address given to `--serve-legacy`, if any was given explicitly.
    pub fn legacy_bind(&self) -> Option<Result<SocketAddr, std::net::AddrParseError>> {
        self.serve_legacy
            .as_deref()
            .filter(|addr| !addr.is_empty())
            .map(str::parse)
    }
}
