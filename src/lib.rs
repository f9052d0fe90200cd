pub mod checkpoint;
pub mod classify;
pub mod config;
pub mod detail;
pub mod discover;
pub mod enrich;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod logger;
pub mod models;
pub mod output;
pub mod page;
pub mod pagination;
pub mod pipeline;
pub mod session;
pub mod testing;

#[cfg(feature = "browser")]
pub mod browser;

pub use config::Config;
pub use error::{AppError, Result};
pub use models::{CompanyMeta, JobCard, ScrapeMetadata, ScrapeOutput};
pub use page::BoardPage;
