use std::process::ExitCode;

use board_scraper::config::{Backend, Config};
use board_scraper::fetch::StaticPage;
use board_scraper::{Result, logger, pipeline};
use log::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    // Argument errors are reported before anything is launched
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(1);
        }
    };

    logger::init();
    info!("Scraping {} for {}", config.board_url, config.firm);

    match run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Run failed: {}", e);
            ExitCode::from(1)
        }
    }
}

async fn run(config: &Config) -> Result<()> {
    match config.backend {
        #[cfg(feature = "browser")]
        Backend::Browser => run_in_browser(config).await,
        _ => {
            info!("Using the static HTTP backend");
            let page = StaticPage::new();
            pipeline::execute(&page, config).await
        }
    }
}

/// The browser is closed on every path out of the run.
#[cfg(feature = "browser")]
async fn run_in_browser(config: &Config) -> Result<()> {
    use board_scraper::browser::{BrowserOptions, BrowserSession};

    let session = BrowserSession::launch(&BrowserOptions {
        headed: config.headed,
        chrome_path: config.chrome_path.clone(),
        nav_timeout: config.nav_timeout,
    })
    .await?;

    let result = pipeline::execute(session.page(), config).await;
    session.close().await?;
    result
}
