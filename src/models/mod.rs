use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScrapeError};

/// Input to a single scrape run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequest {
    seed_url: String,
    max_pages: u32,
}

impl ScrapeRequest {
    /// Build a request, rejecting an empty seed URL or a zero page budget
    pub fn new(seed_url: impl Into<String>, max_pages: u32) -> Result<Self> {
        let seed_url = seed_url.into().trim().to_string();
        if seed_url.is_empty() {
            return Err(ScrapeError::InvalidRequest("seed URL is empty".to_string()));
        }
        if max_pages == 0 {
            return Err(ScrapeError::InvalidRequest(
                "max pages must be at least 1".to_string(),
            ));
        }
        Ok(Self { seed_url, max_pages })
    }

    pub fn seed_url(&self) -> &str {
        &self.seed_url
    }

    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }
}

/// One structured item extracted from a listing page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub title: String,
    pub price: Option<String>,
    pub price_numeric: Option<f64>,
    pub availability: Option<String>,
    pub category: Option<String>,
    pub rendered_snippet: Option<String>,
}

/// What a site parser pulls out of one page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageResult {
    pub records: Vec<Record>,
    pub next_url: Option<String>,
}

/// Records of a run that reached `Completed`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub records: Vec<Record>,
}

/// Run metadata handed to storage alongside the records
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub source_url: String,
    pub pages: u32,
    pub item_count: usize,
    pub created_at: DateTime<Utc>,
    pub records: Vec<Record>,
}

impl RunSummary {
    pub fn new(request: &ScrapeRequest, outcome: RunOutcome) -> Self {
        Self {
            source_url: request.seed_url().to_string(),
            pages: request.max_pages(),
            item_count: outcome.records.len(),
            created_at: Utc::now(),
            records: outcome.records,
        }
    }
}
