//! Command-line / environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_LOG_FILE: &str = "chatbot-tui.log";

/// Terminal chat client for a chatbot server exposing POST /chat.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatbot-tui")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Chat with a /chat endpoint from the terminal")]
pub struct Config {
    /// Server root; /chat and /reset are resolved against it
    #[arg(long, env = "CHATBOT_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Give up on a request after this many seconds (no limit when unset)
    #[arg(long, env = "CHATBOT_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Where diagnostics go while the terminal is in use
    #[arg(long, env = "CHATBOT_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Rejects base URLs that are not plain http(s).
    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.base_url)
            .with_context(|| format!("invalid base URL: {}", self.base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("base URL must be http or https, got {}", url.scheme());
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_FILE))
    }
}
