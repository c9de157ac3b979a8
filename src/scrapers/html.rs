//! Extraction helpers shared by the site parsers.

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

static NEXT_LINK: LazyLock<Selector> = LazyLock::new(|| css("li.next a"));

/// Compile a selector literal
pub(crate) fn css(selector: &'static str) -> Selector {
    Selector::parse(selector).unwrap_or_else(|e| panic!("invalid selector {selector}: {e}"))
}

/// Text of the first match under `element`, whitespace-collapsed
pub(crate) fn first_text(element: ElementRef<'_>, selector: &Selector) -> String {
    element
        .select(selector)
        .next()
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .unwrap_or_default()
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(crate) fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Numeric value of a price label such as "£51.77"
pub(crate) fn parse_price(price: &str) -> Option<f64> {
    let cleaned: String = price
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Absolute URL of the page's "next" link, if it has one
pub(crate) fn next_page_url(document: &Html, current_url: &Url) -> Option<String> {
    let href = document
        .select(&NEXT_LINK)
        .next()
        .and_then(|link| link.value().attr("href"))?
        .trim();
    if href.is_empty() {
        return None;
    }
    match current_url.join(href) {
        Ok(next) => Some(next.to_string()),
        Err(e) => {
            debug!(href, error = %e, "Ignoring unresolvable next link");
            None
        }
    }
}
