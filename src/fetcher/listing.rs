//! Listing-page link extraction and date-range resolution
//!
//! A variable's listing page enumerates one anchor per published day, newest
//! first, each with an 8-digit `YYYYMMDD` date embedded in the visible text.
//! The resolver reverses them to oldest-first, locates the slice covering a
//! requested [`DateRange`] by day offsets from the most recent entry, and
//! verifies every selected entry against the calendar day it should carry so
//! a gap in the listing fails loudly instead of shifting the selection.

use chrono::{Duration, NaiveDate};
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::OnceLock;

use crate::fetcher::config::LISTING_URL_BASE;
use crate::DateRange;

/// Listing resolution errors
#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    /// Page contained no anchor elements at all
    #[error("listing page contains no anchors")]
    NoAnchors,

    /// Anchors exist but none carries a recognizable 8-digit date
    #[error("no anchor text contains an 8-digit date")]
    NoDatedAnchors,

    /// The requested range is not covered by the listing
    #[error("range {start}..{end} not covered by listing ({oldest}..{newest})")]
    RangeOutsideListing {
        /// Requested start date
        start: NaiveDate,
        /// Requested end date
        end: NaiveDate,
        /// Oldest date on the listing page
        oldest: NaiveDate,
        /// Newest date on the listing page
        newest: NaiveDate,
    },

    /// The listing skips a day inside the requested range
    #[error("listing is missing a file for {expected} (found {found} at its position)")]
    MissingDay {
        /// Date the slice position should carry
        expected: NaiveDate,
        /// Date actually found there
        found: NaiveDate,
    },
}

/// One dated link from a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEntry {
    /// Target of the anchor, as published
    pub href: String,
    /// Calendar date parsed from the anchor text
    pub date: NaiveDate,
}

/// Listing page URL for a variable
pub fn listing_url(variable: &str) -> String {
    format!("{LISTING_URL_BASE}{variable}/")
}

/// Extract the calendar date from an 8-digit `YYYYMMDD` substring
///
/// Scans all 8-digit runs in the text and returns the first that parses as a
/// valid date, so surrounding digits (file sizes, counters) do not confuse it.
pub fn extract_date(text: &str) -> Option<NaiveDate> {
    static DATE_RE: OnceLock<Regex> = OnceLock::new();
    // SAFETY: literal pattern, compiles.
    let re = DATE_RE.get_or_init(|| Regex::new(r"[0-9]{8}").expect("valid literal regex"));

    re.find_iter(text)
        .filter_map(|m| NaiveDate::parse_from_str(m.as_str(), "%Y%m%d").ok())
        .next()
}

/// Parse a listing page into its dated links, in page order (newest first)
///
/// # Errors
/// [`ListingError::NoAnchors`] for a page without anchors (e.g. an error
/// body returned with a tolerated non-200 status),
/// [`ListingError::NoDatedAnchors`] when anchors exist but none is dated.
pub fn parse_listing(html: &str) -> Result<Vec<LinkEntry>, ListingError> {
    let document = Html::parse_document(html);
    // SAFETY: literal selector, parses.
    let anchors = Selector::parse("a").expect("valid literal selector");

    let mut entries = Vec::new();
    let mut saw_anchor = false;
    for anchor in document.select(&anchors) {
        saw_anchor = true;
        let text: String = anchor.text().collect();
        if let (Some(date), Some(href)) = (extract_date(&text), anchor.value().attr("href")) {
            entries.push(LinkEntry {
                href: href.to_string(),
                date,
            });
        }
    }

    if !saw_anchor {
        Err(ListingError::NoAnchors)
    } else if entries.is_empty() {
        Err(ListingError::NoDatedAnchors)
    } else {
        Ok(entries)
    }
}

/// Select the links covering a date range, oldest first
///
/// `entries` is the listing in page order (newest first). The most recent
/// entry fixes the last available date; day offsets from it locate the slice
/// for `range`. Every selected entry is then checked against the day its
/// position implies.
pub fn resolve_links(entries: &[LinkEntry], range: &DateRange) -> Result<Vec<String>, ListingError> {
    if entries.is_empty() {
        return Err(ListingError::NoDatedAnchors);
    }

    let oldest_first: Vec<&LinkEntry> = entries.iter().rev().collect();
    // Non-empty by the guard above.
    let newest = oldest_first[oldest_first.len() - 1].date;
    let oldest = oldest_first[0].date;

    let offset_end = (newest - range.end()).num_days();
    let offset_start = (newest - range.start()).num_days();
    if offset_end < 0 || offset_start >= oldest_first.len() as i64 {
        return Err(ListingError::RangeOutsideListing {
            start: range.start(),
            end: range.end(),
            oldest,
            newest,
        });
    }

    let last = oldest_first.len() - 1;
    let slice = &oldest_first[last - offset_start as usize..=last - offset_end as usize];

    for (day, entry) in slice.iter().enumerate() {
        let expected = range.start() + Duration::days(day as i64);
        if entry.date != expected {
            return Err(ListingError::MissingDay {
                expected,
                found: entry.date,
            });
        }
    }

    Ok(slice.iter().map(|e| e.href.clone()).collect())
}
