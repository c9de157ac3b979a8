use crate::config::ScrapeConfig;
use crate::error::{Result, ScrapeError};
use crate::models::{Record, RunOutcome, ScrapeRequest};
use crate::scrapers::events::ProgressEvent;
use crate::scrapers::registry::ParserRegistry;
use crate::scrapers::traits::{PageSource, ProgressSink, SiteParser};
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use url::Url;

/// Share of the progress bar given to fetching
const FETCH_WEIGHT: f64 = 40.0;
/// Share of the progress bar reached once a page is parsed
const PARSE_WEIGHT: f64 = 90.0;
const PARSE_CEILING: u8 = 95;

/// Walks a paginated listing one page at a time, fetching, parsing and reporting progress
pub struct PaginationDriver<'a> {
    registry: &'a ParserRegistry,
    source: &'a dyn PageSource,
    politeness_delay: Duration,
}

impl<'a> PaginationDriver<'a> {
    pub fn new(registry: &'a ParserRegistry, source: &'a dyn PageSource, config: &ScrapeConfig) -> Self {
        Self {
            registry,
            source,
            politeness_delay: config.politeness_delay(),
        }
    }

    /// Run one scrape to completion.
    ///
    /// Every run ends with exactly one `Completed` or `Failed` event on `sink`.
    /// Cancellation is checked before each fetch and also interrupts an in-flight
    /// fetch or politeness delay; a cancelled run delivers no records.
    pub async fn run(
        &self,
        request: &ScrapeRequest,
        sink: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<RunOutcome> {
        let mut run = Run::new(sink, request.max_pages());

        let (site, mut current) = match self.registry.resolve(request.seed_url()) {
            Ok(resolved) => resolved,
            Err(e) => return Err(run.fail(e)),
        };

        info!(
            url = %current,
            site = site.site_name(),
            max_pages = run.max_pages,
            "Starting scrape"
        );

        loop {
            run.page += 1;

            if cancel.is_cancelled() {
                return Err(run.fail(ScrapeError::Cancelled));
            }

            let percent = run.fetch_percent();
            run.progress(format!("Fetching page {}...", run.page), percent);

            let html = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(run.fail(ScrapeError::Cancelled)),
                fetched = self.source.fetch(&current) => match fetched {
                    Ok(html) => html,
                    Err(e) => return Err(run.fail(e)),
                },
            };

            let page = site.parse_page(&html, &current);
            let found = page.records.len();
            run.records.extend(page.records);
            debug!(page = run.page, found, total = run.records.len(), "Parsed page");

            let percent = run.parse_percent();
            run.progress(format!("Fetched {found} items"), percent);

            let next = match page.next_url {
                Some(next) if run.page < run.max_pages => next,
                _ => break,
            };
            current = match Url::parse(&next) {
                Ok(url) => url,
                Err(e) => {
                    return Err(run.fail(ScrapeError::InvalidUrl {
                        url: next,
                        reason: e.to_string(),
                    }))
                }
            };

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(run.fail(ScrapeError::Cancelled)),
                _ = tokio::time::sleep(self.politeness_delay) => {}
            }
        }

        Ok(run.complete())
    }
}

/// State owned by a single run
struct Run<'s> {
    sink: &'s dyn ProgressSink,
    max_pages: u32,
    page: u32,
    last_percent: u8,
    records: Vec<Record>,
}

impl<'s> Run<'s> {
    fn new(sink: &'s dyn ProgressSink, max_pages: u32) -> Self {
        Self {
            sink,
            max_pages,
            page: 0,
            last_percent: 0,
            records: Vec::new(),
        }
    }

    fn fetch_percent(&self) -> u8 {
        let share = f64::from(self.page - 1) / f64::from(self.max_pages);
        (share * FETCH_WEIGHT).round() as u8
    }

    fn parse_percent(&self) -> u8 {
        let share = f64::from(self.page) / f64::from(self.max_pages);
        ((share * PARSE_WEIGHT).round() as u8).min(PARSE_CEILING)
    }

    /// Report progress; the bar never moves backwards within a run
    fn progress(&mut self, message: String, percent: u8) {
        let percent = percent.max(self.last_percent);
        self.last_percent = percent;
        deliver(self.sink, ProgressEvent::Progress { message, percent });
    }

    fn fail(self, err: ScrapeError) -> ScrapeError {
        error!(error = %err, page = self.page, "Scrape failed");
        deliver(
            self.sink,
            ProgressEvent::Failed {
                message: err.to_string(),
            },
        );
        err
    }

    fn complete(self) -> RunOutcome {
        info!(pages = self.page, records = self.records.len(), "Scrape complete");
        deliver(
            self.sink,
            ProgressEvent::Completed {
                record_count: self.records.len(),
            },
        );
        RunOutcome {
            records: self.records,
        }
    }
}

/// Hand an event to the sink; sink errors and panics never reach the run
pub(crate) fn deliver(sink: &dyn ProgressSink, event: ProgressEvent) {
    match panic::catch_unwind(AssertUnwindSafe(|| sink.on_event(&event))) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, event = event.event_name(), "Dropped progress event"),
        Err(_) => warn!(event = event.event_name(), "Progress sink panicked, event dropped"),
    }
}
