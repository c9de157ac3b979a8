use crate::models::{PageResult, Record};
use crate::scrapers::html::{
    collapse_whitespace, css, escape_html, first_text, next_page_url, non_empty, parse_price,
};
use crate::scrapers::traits::SiteParser;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

static PRODUCT: LazyLock<Selector> = LazyLock::new(|| css(".product_pod"));
static TITLE_LINK: LazyLock<Selector> = LazyLock::new(|| css("h3 a"));
static PRICE: LazyLock<Selector> = LazyLock::new(|| css(".price_color"));
static AVAILABILITY: LazyLock<Selector> = LazyLock::new(|| css(".availability"));
static BREADCRUMB: LazyLock<Selector> = LazyLock::new(|| css("ul.breadcrumb li"));

const DEFAULT_CATEGORY: &str = "Books";

/// Parser for books.toscrape.com catalogue pages
#[derive(Debug, Default, Clone, Copy)]
pub struct BooksParser;

impl SiteParser for BooksParser {
    fn parse_page(&self, html: &str, current_url: &Url) -> PageResult {
        let document = Html::parse_document(html);

        // The breadcrumb is page-wide; every book on a category page shares it
        let category = document
            .select(&BREADCRUMB)
            .nth(2)
            .map(|li| collapse_whitespace(&li.text().collect::<String>()))
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

        let records: Vec<Record> = document
            .select(&PRODUCT)
            .map(|product| {
                let title = product
                    .select(&TITLE_LINK)
                    .next()
                    .and_then(|link| link.value().attr("title"))
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| first_text(product, &TITLE_LINK));
                let price = first_text(product, &PRICE);
                let availability = first_text(product, &AVAILABILITY);

                let rendered_snippet = format!(
                    "<strong>{}</strong><br>{}<br><em>{}</em>",
                    escape_html(&title),
                    escape_html(&price),
                    escape_html(&availability)
                );

                Record {
                    price_numeric: parse_price(&price),
                    price: non_empty(price),
                    availability: non_empty(availability),
                    category: Some(category.clone()),
                    rendered_snippet: Some(rendered_snippet),
                    title,
                }
            })
            .collect();

        let next_url = next_page_url(&document, current_url);
        debug!(url = %current_url, records = records.len(), next = ?next_url, "Parsed books page");

        PageResult { records, next_url }
    }

    fn site_name(&self) -> &'static str {
        "Books to Scrape"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE: &str = r#"
<html><body>
<ul class="breadcrumb">
  <li><a href="../../index.html">Home</a></li>
  <li><a href="../books_1/index.html">Books</a></li>
  <li class="active">Poetry</li>
</ul>
<ol class="row">
  <li><article class="product_pod">
    <h3><a href="a-light-in-the-attic_1000/index.html" title="A Light in the Attic">A Light in the ...</a></h3>
    <div class="product_price">
      <p class="price_color">£51.77</p>
      <p class="instock availability">
        <i class="icon-ok"></i>
          In stock
      </p>
    </div>
  </article></li>
  <li><article class="product_pod">
    <h3><a href="untitled/index.html">Untitled &amp; Co</a></h3>
  </article></li>
</ol>
<ul class="pager"><li class="next"><a href="page-2.html">next</a></li></ul>
</body></html>"#;

    fn url() -> Url {
        Url::parse("https://books.toscrape.com/catalogue/category/books/poetry_23/index.html")
            .unwrap()
    }

    #[test]
    fn extracts_books_in_document_order() {
        let page = BooksParser.parse_page(PAGE, &url());
        assert_eq!(page.records.len(), 2);

        let first = &page.records[0];
        assert_eq!(first.title, "A Light in the Attic");
        assert_eq!(first.price.as_deref(), Some("£51.77"));
        assert_eq!(first.price_numeric, Some(51.77));
        assert_eq!(first.availability.as_deref(), Some("In stock"));
        assert_eq!(first.category.as_deref(), Some("Poetry"));
        assert_eq!(
            first.rendered_snippet.as_deref(),
            Some("<strong>A Light in the Attic</strong><br>£51.77<br><em>In stock</em>")
        );
    }

    #[test]
    fn missing_fields_stay_empty() {
        let page = BooksParser.parse_page(PAGE, &url());
        let second = &page.records[1];
        assert_eq!(second.title, "Untitled & Co");
        assert_eq!(second.price, None);
        assert_eq!(second.price_numeric, None);
        assert_eq!(second.availability, None);
    }

    #[test]
    fn next_link_is_absolute() {
        let page = BooksParser.parse_page(PAGE, &url());
        assert_eq!(
            page.next_url.as_deref(),
            Some("https://books.toscrape.com/catalogue/category/books/poetry_23/page-2.html")
        );
    }

    #[test]
    fn category_defaults_without_breadcrumb() {
        let html = r#"<article class="product_pod"><h3><a title="Solo">Solo</a></h3></article>"#;
        let page = BooksParser.parse_page(html, &url());
        assert_eq!(page.records[0].category.as_deref(), Some("Books"));
        assert_eq!(page.next_url, None);
    }

    #[test]
    fn unrecognised_document_yields_empty_page() {
        let page = BooksParser.parse_page("<html><p>nothing here</p></html>", &url());
        assert!(page.records.is_empty());
        assert_eq!(page.next_url, None);
    }
}
