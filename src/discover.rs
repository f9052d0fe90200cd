//! Operator debugging: render a board and dump what the scraper would see.

use std::fs;
use std::path::PathBuf;

use log::{info, warn};
use scraper::Html;

use crate::config::Config;
use crate::error::Result;
use crate::extract::Layout;
use crate::page::BoardPage;
use crate::pagination::visible_items;
use crate::session::open_board;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryReport {
    pub layout: Layout,
    pub items: usize,
    pub markup: PathBuf,
    pub screenshot: Option<PathBuf>,
}

pub async fn discover(page: &dyn BoardPage, config: &Config) -> Result<DiscoveryReport> {
    let listing = open_board(page, &config.board_url, config.filter.as_deref(), &config.session()).await?;
    let items = visible_items(page).await?;
    let html = page.html().await?;
    let layout = Layout::probe(&Html::parse_document(&html));
    info!("{} renders the {} layout with {} visible items", listing, layout, items);

    fs::create_dir_all(&config.dump_dir)?;
    let markup = config.dump_dir.join("discovery.html");
    fs::write(&markup, &html)?;
    info!("Rendered markup written to {}", markup.display());

    let path = config.dump_dir.join("discovery.png");
    let screenshot = match page.screenshot(&path).await {
        Ok(()) => {
            info!("Screenshot written to {}", path.display());
            Some(path)
        }
        Err(e) => {
            warn!("No screenshot taken: {}", e);
            None
        }
    };

    Ok(DiscoveryReport {
        layout,
        items,
        markup,
        screenshot,
    })
}
