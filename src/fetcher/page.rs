//! Day-page payload extraction
//!
//! A day page wraps the raw delimited table in the first `<p>` element of
//! the body. Because non-200 responses are tolerated by the fetcher, a page
//! without that element is a real possibility and gets a typed error here.

use scraper::{Html, Selector};

/// Day-page structure errors
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// The page has no paragraph element holding the table text
    #[error("day page contains no <p> data block")]
    MissingParagraph,
}

/// Extract the raw table text from a fetched day page
pub fn extract_table_payload(html: &str) -> Result<String, PageError> {
    let document = Html::parse_document(html);
    // SAFETY: literal selector, parses.
    let paragraphs = Selector::parse("p").expect("valid literal selector");

    document
        .select(&paragraphs)
        .next()
        .map(|p| p.text().collect::<String>())
        .ok_or(PageError::MissingParagraph)
}
