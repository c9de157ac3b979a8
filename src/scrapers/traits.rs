use crate::error::{Result, SinkError};
use crate::models::PageResult;
use crate::scrapers::events::ProgressEvent;
use async_trait::async_trait;
use url::Url;

/// Extraction rules for one listing site.
/// Adding a site means implementing this and registering its host.
pub trait SiteParser: Send + Sync {
    /// Extract the records and the absolute next-page URL from one page.
    /// Never fails: missing fields stay empty and a missing next link ends pagination.
    fn parse_page(&self, html: &str, current_url: &Url) -> PageResult;

    /// Get the name of the site
    fn site_name(&self) -> &'static str;
}

/// Where page HTML comes from
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the page body, retrying per the source's own policy
    async fn fetch(&self, url: &Url) -> Result<String>;
}

/// Consumer of a run's progress events
pub trait ProgressSink: Send + Sync {
    /// Take one event. Must not block; a failure is logged and ignored by the run.
    fn on_event(&self, event: &ProgressEvent) -> std::result::Result<(), SinkError>;
}
