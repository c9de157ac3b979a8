//! Paginated listing scraper for a fixed set of known sites.
//!
//! A run resolves the seed URL to a site parser, then fetches and parses up to
//! `max_pages` pages in sequence, streaming [`ProgressEvent`]s to a sink.

pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod scrapers;

pub use config::{FetchConfig, ScrapeConfig};
pub use error::{Result, ScrapeError, SinkError};
pub use models::{PageResult, Record, RunOutcome, RunSummary, ScrapeRequest};
pub use scrapers::{
    stream_sse, ChannelSink, HttpFetcher, NoopSink, PageSource, PaginationDriver,
    ParserRegistry, ProgressEvent, ProgressSink, Site, SiteParser, HEARTBEAT_INTERVAL,
};

use tokio_util::sync::CancellationToken;

/// Scrape `request` with the default configuration and the known sites
pub async fn run_scrape(request: &ScrapeRequest, sink: &dyn ProgressSink) -> Result<RunOutcome> {
    let config = ScrapeConfig::default();
    let fetcher = match HttpFetcher::new(config.fetch.clone()) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            scrapers::driver::deliver(
                sink,
                ProgressEvent::Failed {
                    message: e.to_string(),
                },
            );
            return Err(e);
        }
    };
    PaginationDriver::new(ParserRegistry::global(), &fetcher, &config)
        .run(request, sink, &CancellationToken::new())
        .await
}
