use crate::config::FetchConfig;
use crate::error::{Result, ScrapeError};
use crate::scrapers::traits::PageSource;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

/// Page fetcher over HTTP with bounded, linearly backed-off retries
pub struct HttpFetcher {
    client: Client,
    config: FetchConfig,
}

impl HttpFetcher {
    /// Create a fetcher with the given user agent, timeout and retry policy
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(ScrapeError::Client)?;

        Ok(Self { client, config })
    }

    async fn get_once(&self, url: &Url) -> reqwest::Result<String> {
        self.client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

#[async_trait]
impl PageSource for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String> {
        let attempts = self.config.attempts();
        let mut attempt = 1;

        loop {
            match self.get_once(url).await {
                Ok(html) => {
                    debug!(url = %url, attempt, bytes = html.len(), "Fetched page");
                    return Ok(html);
                }
                Err(e) if attempt < attempts => {
                    let delay = self.config.backoff(attempt);
                    warn!(
                        url = %url,
                        error = %e,
                        attempt,
                        attempts,
                        delay_ms = delay.as_millis() as u64,
                        "Fetch failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    return Err(ScrapeError::Fetch {
                        url: url.to_string(),
                        source: e,
                    });
                }
            }
        }
    }
}
