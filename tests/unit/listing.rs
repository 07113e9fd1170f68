//! Unit tests for listing-page date extraction and link resolution

use chrono::NaiveDate;
use omie_data_downloader::fetcher::{extract_date, parse_listing, resolve_links, ListingError};
use omie_data_downloader::DateRange;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_extract_date_from_typical_link_texts() {
    // Shapes the site actually uses plus noisy variants around them
    let cases = [
        ("marginalpdbc_20181001.1", date(2018, 10, 1)),
        ("pdbc_tot_20180228.1", date(2018, 2, 28)),
        ("  INT_PBC_20200101.TXT  ", date(2020, 1, 1)),
        ("prefix20161231suffix", date(2016, 12, 31)),
        ("20181001", date(2018, 10, 1)),
    ];
    for (text, expected) in cases {
        assert_eq!(extract_date(text), Some(expected), "text: {text:?}");
    }
}

#[test]
fn test_extract_date_rejects_text_without_a_valid_date() {
    assert_eq!(extract_date("parent directory"), None);
    assert_eq!(extract_date("1234567"), None);
    // 8 digits but not a calendar date
    assert_eq!(extract_date("00000000"), None);
}

/// Build a listing page with one anchor per date, newest first like the site
fn listing_html(dates: &[NaiveDate]) -> String {
    let anchors: Vec<String> = dates
        .iter()
        .map(|d| {
            let stamp = d.format("%Y%m%d");
            format!("<a href=\"http://host/dl/marginalpdbc_{stamp}.1\">marginalpdbc_{stamp}.1</a>")
        })
        .collect();
    format!("<html><body>{}</body></html>", anchors.join("\n"))
}

/// N dated anchors, range fully contained: exactly the expected contiguous
/// oldest-first subsequence of hrefs comes back.
#[test]
fn test_resolver_returns_expected_oldest_first_subsequence() {
    let newest = date(2018, 10, 10);
    let dates: Vec<NaiveDate> = (0..30).map(|i| newest - chrono::Duration::days(i)).collect();
    let entries = parse_listing(&listing_html(&dates)).unwrap();

    let range = DateRange::parse("2018-10-02", "2018-10-05").unwrap();
    let links = resolve_links(&entries, &range).unwrap();

    assert_eq!(
        links,
        vec![
            "http://host/dl/marginalpdbc_20181002.1",
            "http://host/dl/marginalpdbc_20181003.1",
            "http://host/dl/marginalpdbc_20181004.1",
            "http://host/dl/marginalpdbc_20181005.1",
        ]
    );
}

#[test]
fn test_resolver_single_day_range() {
    let newest = date(2018, 10, 10);
    let dates: Vec<NaiveDate> = (0..10).map(|i| newest - chrono::Duration::days(i)).collect();
    let entries = parse_listing(&listing_html(&dates)).unwrap();

    let range = DateRange::parse("2018-10-10", "2018-10-10").unwrap();
    let links = resolve_links(&entries, &range).unwrap();
    assert_eq!(links, vec!["http://host/dl/marginalpdbc_20181010.1"]);
}

#[test]
fn test_resolver_fails_on_gap_inside_range() {
    // 2018-10-04 never published
    let mut dates: Vec<NaiveDate> = (0..10)
        .map(|i| date(2018, 10, 10) - chrono::Duration::days(i))
        .collect();
    dates.retain(|d| *d != date(2018, 10, 4));
    let entries = parse_listing(&listing_html(&dates)).unwrap();

    let range = DateRange::parse("2018-10-03", "2018-10-06").unwrap();
    match resolve_links(&entries, &range).unwrap_err() {
        ListingError::MissingDay { expected, .. } => {
            // The shifted slice is detected at its first wrong position
            assert!(expected >= date(2018, 10, 3));
        }
        other => panic!("expected MissingDay, got {other:?}"),
    }
}

#[test]
fn test_resolver_fails_when_range_not_listed() {
    let dates: Vec<NaiveDate> = (0..3)
        .map(|i| date(2018, 10, 10) - chrono::Duration::days(i))
        .collect();
    let entries = parse_listing(&listing_html(&dates)).unwrap();

    let future = DateRange::parse("2018-10-11", "2018-10-12").unwrap();
    assert!(matches!(
        resolve_links(&entries, &future),
        Err(ListingError::RangeOutsideListing { .. })
    ));

    let too_old = DateRange::parse("2018-09-01", "2018-10-09").unwrap();
    assert!(matches!(
        resolve_links(&entries, &too_old),
        Err(ListingError::RangeOutsideListing { .. })
    ));
}

#[test]
fn test_parse_listing_requires_dated_anchors() {
    assert!(matches!(
        parse_listing("<html><body>empty</body></html>"),
        Err(ListingError::NoAnchors)
    ));
    assert!(matches!(
        parse_listing("<a href=\"/\">..</a><a href=\"/x\">readme</a>"),
        Err(ListingError::NoDatedAnchors)
    ));
}
