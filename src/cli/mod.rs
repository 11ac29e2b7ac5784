//! Command-line interface parsing and handling
//!
//! Parses arguments, layers them over the config file, and runs the
//! line-mode chat loop.

pub mod repl;

use std::error::Error;
use std::path::PathBuf;
use std::sync::{Arc, LazyLock};

use clap::Parser;
use tracing::{debug, warn};

use crate::api::HttpTransport;
use crate::core::config::defaults::Overrides;
use crate::core::config::{Config, ConfigError, Settings};
use crate::logging;

static LONG_VERSION: LazyLock<String> = LazyLock::new(|| {
    format!(
        "{} (commit {})",
        env!("CARGO_PKG_VERSION"),
        option_env!("VERGEN_GIT_SHA").unwrap_or("unknown")
    )
});

#[derive(Parser, Debug)]
#[command(name = "parlance", version)]
#[command(about = "Chat with a remote service and read replies as they appear")]
#[command(long_version = LONG_VERSION.as_str())]
#[command(
    long_about = "Parlance sends each line you type to a chat service and reveals the reply \
word by word. Replies are rendered as lightweight markdown: headings, lists, emphasis and \
fenced code blocks.\n\n\
Environment Variables:\n\
  PARLANCE_ENDPOINT   Chat endpoint (overridden by --endpoint)\n\
  PARLANCE_LOG        Log filter, e.g. parlance=debug\n\n\
Commands:\n\
  /cancel             Stop the reply being revealed\n\
  /new                Start a new conversation\n\
  /quit               Exit"
)]
pub struct Args {
    /// URL the chat request is posted to
    #[arg(short = 'e', long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Read configuration from this file instead of the default location
    #[arg(short = 'c', long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Delay between revealed words, in milliseconds
    #[arg(long = "tick-ms", value_name = "MS")]
    pub tick_ms: Option<u64>,

    /// Theme name (dark, light, monochrome)
    #[arg(long)]
    pub theme: Option<String>,

    /// Print replies as raw text
    #[arg(long)]
    pub no_markdown: bool,

    /// Do not highlight code blocks
    #[arg(long)]
    pub no_syntax: bool,

    /// Log debug diagnostics to stderr
    #[arg(short = 'd', long)]
    pub debug: bool,
}

impl Args {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            endpoint: self.endpoint.clone(),
            tick_interval_ms: self.tick_ms,
            theme: self.theme.clone(),
            no_markdown: self.no_markdown,
            no_syntax: self.no_syntax,
        }
    }

    pub fn load_config(&self) -> Result<Config, ConfigError> {
        match &self.config {
            Some(path) => Config::load_from_path(path),
            None => match Config::load() {
                Err(ConfigError::NoConfigDir) => {
                    warn!("No config directory available; using defaults");
                    Ok(Config::default())
                }
                other => other,
            },
        }
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    logging::init(args.debug);

    tokio::runtime::Runtime::new()?.block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<(), Box<dyn Error>> {
    let config = args.load_config()?;
    let settings = Settings::from_env(&config, &args.overrides());
    debug!(
        endpoint = %settings.endpoint,
        tick_ms = settings.tick_interval.as_millis() as u64,
        markdown = settings.markdown,
        "Settings resolved"
    );

    let transport = HttpTransport::new(settings.endpoint.clone(), settings.request_timeout)?;
    repl::run(Arc::new(transport), &settings).await
}
