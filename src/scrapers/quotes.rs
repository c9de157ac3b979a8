use crate::models::{PageResult, Record};
use crate::scrapers::html::{collapse_whitespace, css, escape_html, first_text, next_page_url, non_empty};
use crate::scrapers::traits::SiteParser;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

static QUOTE: LazyLock<Selector> = LazyLock::new(|| css(".quote"));
static TEXT: LazyLock<Selector> = LazyLock::new(|| css(".text"));
static AUTHOR: LazyLock<Selector> = LazyLock::new(|| css(".author"));
static TAG: LazyLock<Selector> = LazyLock::new(|| css(".tags .tag"));

const DEFAULT_CATEGORY: &str = "Quotes";

/// Parser for quotes.toscrape.com pages.
///
/// Quotes have no price; the author goes in `availability` and the tags in `category`.
#[derive(Debug, Default, Clone, Copy)]
pub struct QuotesParser;

impl SiteParser for QuotesParser {
    fn parse_page(&self, html: &str, current_url: &Url) -> PageResult {
        let document = Html::parse_document(html);

        let records: Vec<Record> = document
            .select(&QUOTE)
            .map(|quote| {
                let text = first_text(quote, &TEXT);
                let author = first_text(quote, &AUTHOR);
                let tags = quote
                    .select(&TAG)
                    .map(|tag| collapse_whitespace(&tag.text().collect::<String>()))
                    .filter(|tag| !tag.is_empty())
                    .collect::<Vec<_>>()
                    .join(", ");

                Record {
                    rendered_snippet: Some(format!("<q>{}</q>", escape_html(&text))),
                    title: text,
                    price: None,
                    price_numeric: None,
                    availability: non_empty(author),
                    category: Some(non_empty(tags).unwrap_or_else(|| DEFAULT_CATEGORY.to_string())),
                }
            })
            .collect();

        let next_url = next_page_url(&document, current_url);
        debug!(url = %current_url, records = records.len(), next = ?next_url, "Parsed quotes page");

        PageResult { records, next_url }
    }

    fn site_name(&self) -> &'static str {
        "Quotes to Scrape"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE: &str = r#"
<div class="col-md-8">
  <div class="quote">
    <span class="text">“The world as we have created it is a process of our thinking.”</span>
    <span>by <small class="author">Albert Einstein</small></span>
    <div class="tags">Tags:
      <a class="tag" href="/tag/change/page/1/">change</a>
      <a class="tag" href="/tag/deep-thoughts/page/1/">deep-thoughts</a>
    </div>
  </div>
  <div class="quote">
    <span class="text">“A day without sunshine is like, you know, night.”</span>
    <span>by <small class="author">Steve Martin</small></span>
    <div class="tags">Tags: </div>
  </div>
  <nav><ul class="pager"><li class="next"><a href="/page/3/">Next</a></li></ul></nav>
</div>"#;

    fn url() -> Url {
        Url::parse("https://quotes.toscrape.com/page/2/").unwrap()
    }

    #[test]
    fn extracts_quotes_with_author_and_tags() {
        let page = QuotesParser.parse_page(PAGE, &url());
        assert_eq!(page.records.len(), 2);

        let first = &page.records[0];
        assert_eq!(
            first.title,
            "“The world as we have created it is a process of our thinking.”"
        );
        assert_eq!(first.price, None);
        assert_eq!(first.price_numeric, None);
        assert_eq!(first.availability.as_deref(), Some("Albert Einstein"));
        assert_eq!(first.category.as_deref(), Some("change, deep-thoughts"));
        assert!(first.rendered_snippet.as_deref().unwrap().starts_with("<q>“The world"));
    }

    #[test]
    fn untagged_quote_falls_back_to_default_category() {
        let page = QuotesParser.parse_page(PAGE, &url());
        assert_eq!(page.records[1].category.as_deref(), Some("Quotes"));
    }

    #[test]
    fn root_relative_next_link_is_joined() {
        let page = QuotesParser.parse_page(PAGE, &url());
        assert_eq!(page.next_url.as_deref(), Some("https://quotes.toscrape.com/page/3/"));
    }
}
