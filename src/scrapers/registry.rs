use crate::error::{Result, ScrapeError};
use crate::models::PageResult;
use crate::scrapers::books::BooksParser;
use crate::scrapers::quotes::QuotesParser;
use crate::scrapers::traits::SiteParser;
use std::collections::HashMap;
use std::sync::OnceLock;
use url::Url;

/// Known listing sites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Site {
    Books,
    Quotes,
}

impl SiteParser for Site {
    fn parse_page(&self, html: &str, current_url: &Url) -> PageResult {
        match self {
            Site::Books => BooksParser.parse_page(html, current_url),
            Site::Quotes => QuotesParser.parse_page(html, current_url),
        }
    }

    fn site_name(&self) -> &'static str {
        match self {
            Site::Books => BooksParser.site_name(),
            Site::Quotes => QuotesParser.site_name(),
        }
    }
}

const KNOWN_SITES: &[(&str, Site)] = &[
    ("books.toscrape.com", Site::Books),
    ("quotes.toscrape.com", Site::Quotes),
];

/// Host to site lookup table
#[derive(Debug, Clone)]
pub struct ParserRegistry {
    sites: HashMap<String, Site>,
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self {
            sites: KNOWN_SITES
                .iter()
                .map(|(host, site)| (host.to_string(), *site))
                .collect(),
        }
    }
}

impl ParserRegistry {
    /// Process-wide registry of the known sites
    pub fn global() -> &'static ParserRegistry {
        static GLOBAL: OnceLock<ParserRegistry> = OnceLock::new();
        GLOBAL.get_or_init(ParserRegistry::default)
    }

    /// Register another host before any run uses this registry
    pub fn with_site(mut self, host: &str, site: Site) -> Self {
        self.sites.insert(host.to_ascii_lowercase(), site);
        self
    }

    /// Find the parser for `url` and return it with the parsed URL
    pub fn resolve(&self, url: &str) -> Result<(Site, Url)> {
        let parsed = Url::parse(url).map_err(|e| ScrapeError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let host = parsed.host_str().ok_or_else(|| ScrapeError::InvalidUrl {
            url: url.to_string(),
            reason: "URL has no host".to_string(),
        })?;
        let site = self
            .sites
            .get(&host.to_ascii_lowercase())
            .copied()
            .ok_or_else(|| ScrapeError::UnsupportedSite(host.to_string()))?;
        Ok((site, parsed))
    }
}
