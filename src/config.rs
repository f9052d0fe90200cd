use std::path::PathBuf;
use std::time::Duration;

use clap::{CommandFactory, Parser};
use clap::error::ErrorKind;
use url::Url;

use crate::enrich::EnrichOptions;
use crate::error::{AppError, Result};
use crate::pagination::PaginationConfig;
use crate::session::SessionConfig;

/// Command-line interface of the board scraper.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "board-scraper",
    about = "Extract US internship listings from a VC portfolio job board"
)]
pub struct Cli {
    /// Board base URL, e.g. https://jobs.example.vc
    #[arg(long)]
    pub url: String,

    /// Display name of the firm running the board
    #[arg(long)]
    pub firm: String,

    /// Output JSON path (required unless --discover)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Text typed into the board's search box
    #[arg(long)]
    pub filter: Option<String>,

    /// Visit every retained job's detail page
    #[arg(long)]
    pub scrape_details: bool,

    /// Milliseconds to wait after each detail page
    #[arg(long, env = "BOARD_SCRAPER_DELAY_MS", default_value_t = 500)]
    pub delay: u64,

    /// Resume enrichment from the checkpoint next to --output
    #[arg(long)]
    pub resume: bool,

    /// Dump a screenshot and rendered markup instead of producing output
    #[arg(long)]
    pub discover: bool,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Directory for discovery dumps
    #[arg(long, default_value = ".")]
    pub dump_dir: PathBuf,

    /// Fetch pages over plain HTTP instead of driving a browser
    #[arg(long = "static")]
    pub static_pages: bool,

    /// Consecutive non-growing pagination rounds before stopping
    #[arg(long, env = "BOARD_SCRAPER_STALE_ROUNDS", default_value_t = crate::pagination::STALE_ROUND_THRESHOLD)]
    pub stale_rounds: u32,

    /// Milliseconds to wait after each pagination trigger
    #[arg(long, env = "BOARD_SCRAPER_SETTLE_MS", default_value_t = 1500)]
    pub settle_ms: u64,

    /// Upper bound in milliseconds on each network-idle wait
    #[arg(long, env = "BOARD_SCRAPER_IDLE_TIMEOUT_MS", default_value_t = 3000)]
    pub idle_timeout_ms: u64,

    /// Per-navigation timeout in milliseconds
    #[arg(long, env = "BOARD_SCRAPER_NAV_TIMEOUT_MS", default_value_t = 30_000)]
    pub nav_timeout_ms: u64,

    /// Extra pause in milliseconds after every 50 detail pages
    #[arg(long, env = "BOARD_SCRAPER_BATCH_PAUSE_MS", default_value_t = 5000)]
    pub batch_pause_ms: u64,

    /// Chromium/Chrome executable to launch
    #[arg(long, env = "CHROME_PATH")]
    pub chrome_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Scrape,
    Discover,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Browser,
    Static,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub board_url: Url,
    /// `--url` as given, trimmed, for the output metadata.
    pub board_url_arg: String,
    pub firm: String,
    pub output: Option<PathBuf>,
    pub filter: Option<String>,
    pub scrape_details: bool,
    pub resume: bool,
    pub mode: RunMode,
    pub backend: Backend,
    pub headed: bool,
    pub dump_dir: PathBuf,
    pub chrome_path: Option<PathBuf>,
    pub delay: Duration,
    pub batch_pause: Duration,
    pub nav_timeout: Duration,
    pub pagination: PaginationConfig,
}

impl Config {
    /// Loads `.env`, parses the process arguments and validates them. Argument
    /// problems come back as [`AppError::Usage`]; `--help` and `--version`
    /// print and exit here.
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        let cli = match Cli::try_parse() {
            Ok(cli) => cli,
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
            Err(e) => return Err(AppError::Usage(e.render().to_string())),
        };
        Self::from_cli(cli)
    }

    pub fn from_cli(cli: Cli) -> Result<Self> {
        let board_url = Url::parse(cli.url.trim())
            .map_err(|e| usage(format!("invalid --url {:?}: {}", cli.url, e)))?;
        if !matches!(board_url.scheme(), "http" | "https") {
            return Err(usage(format!("--url must be http(s), got {:?}", cli.url)));
        }
        if cli.firm.trim().is_empty() {
            return Err(usage("--firm must not be empty".to_string()));
        }

        let mode = if cli.discover { RunMode::Discover } else { RunMode::Scrape };
        if mode == RunMode::Scrape && cli.output.is_none() {
            return Err(usage("the following required arguments were not provided: --output <OUTPUT>".to_string()));
        }
        if cli.stale_rounds == 0 {
            return Err(usage("--stale-rounds must be at least 1".to_string()));
        }

        let backend = if cli.static_pages || !cfg!(feature = "browser") {
            Backend::Static
        } else {
            Backend::Browser
        };

        Ok(Config {
            board_url,
            board_url_arg: cli.url.trim().to_string(),
            firm: cli.firm.trim().to_string(),
            output: cli.output,
            filter: cli.filter,
            scrape_details: cli.scrape_details,
            resume: cli.resume,
            mode,
            backend,
            headed: cli.headed,
            dump_dir: cli.dump_dir,
            chrome_path: cli.chrome_path,
            delay: Duration::from_millis(cli.delay),
            batch_pause: Duration::from_millis(cli.batch_pause_ms),
            nav_timeout: Duration::from_millis(cli.nav_timeout_ms),
            pagination: PaginationConfig {
                stale_rounds: cli.stale_rounds,
                settle: Duration::from_millis(cli.settle_ms),
                idle_timeout: Duration::from_millis(cli.idle_timeout_ms),
            },
        })
    }

    pub fn session(&self) -> SessionConfig {
        SessionConfig {
            idle_timeout: self.pagination.idle_timeout,
            ..SessionConfig::default()
        }
    }

    pub fn enrich_options(&self) -> EnrichOptions {
        EnrichOptions {
            delay: self.delay,
            batch_pause: self.batch_pause,
            checkpoint: self.output.as_deref().map(crate::checkpoint::checkpoint_path),
            ..EnrichOptions::default()
        }
    }
}

fn usage(message: String) -> AppError {
    let usage = Cli::command().render_usage();
    AppError::Usage(format!("error: {}\n\n{}\n\nFor more information, try '--help'.", message, usage))
}
