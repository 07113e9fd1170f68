//! End-to-end download tests against an in-memory site
//!
//! A fake [`PageFetcher`] serves listing and day pages for two variables
//! (one per source layout); the executor runs against it exactly as it would
//! against the real site, minus the network.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use omie_data_downloader::downloader::{DownloadError, DownloadExecutor, DownloadJob};
use omie_data_downloader::fetcher::{listing_url, FetcherError, FetcherResult, PageFetcher};
use omie_data_downloader::shutdown::ShutdownCoordinator;
use omie_data_downloader::DateRange;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory page source with a fetch log
#[derive(Clone, Default)]
struct FakeFetcher {
    pages: Arc<Mutex<HashMap<String, String>>>,
    log: Arc<Mutex<Vec<String>>>,
}

impl FakeFetcher {
    fn insert(&self, url: impl Into<String>, body: impl Into<String>) {
        self.pages.lock().unwrap().insert(url.into(), body.into());
    }

    fn fetched(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for FakeFetcher {
    async fn fetch_text(&self, url: &str) -> FetcherResult<String> {
        self.log.lock().unwrap().push(url.to_string());
        self.pages
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| FetcherError::NetworkError(format!("no page for {url}")))
    }
}

/// pdbc_tot series labels in file order; `true` marks the auxiliary totals
/// the default registry excludes from the merged table.
const PDBC_TOT_ROWS: &[(&str, bool)] = &[
    ("Energia total del mercado iberico", true),
    ("Energia compra sistema espanol", false),
    ("Energia venta sistema espanol", false),
    ("Energia total sistema espanol", true),
    ("Energia bilateral sistema espanol", true),
    ("Energia compra sistema portugues", false),
    ("Energia venta sistema portugues", false),
    ("Energia total sistema portugues", true),
    ("Energia bilateral sistema portugues", true),
    ("Exportacion Espana-Francia", false),
    ("Importacion Espana-Francia", false),
    ("Energia total con bilaterales", true),
];

fn day_url(variable: &str, date: NaiveDate) -> String {
    format!("http://host/dl/{variable}_{}.1", date.format("%Y%m%d"))
}

fn listing_page(variable: &str, newest: NaiveDate, days: i64) -> String {
    let anchors: Vec<String> = (0..days)
        .map(|i| {
            let date = newest - chrono::Duration::days(i);
            let stamp = date.format("%Y%m%d");
            format!(
                "<a href=\"{}\">{variable}_{stamp}.1</a>",
                day_url(variable, date)
            )
        })
        .collect();
    format!("<html><body>{}</body></html>", anchors.join("\n"))
}

fn format1_page(base: &str, date: NaiveDate, offset: f64) -> String {
    let mut table = format!("{base};\r\n");
    for hour in 1..=24 {
        table.push_str(&format!(
            "{};{:02};{:02};{hour};{:.2};{:.2};\r\n",
            date.year(),
            date.month(),
            date.day(),
            offset + hour as f64,
            offset + hour as f64 + 0.5,
        ));
    }
    table.push('*');
    format!("<html><body><p>{table}</p></body></html>")
}

fn format2_page(date: NaiveDate, offset: f64) -> String {
    let mut table = format!(
        "PDBC_TOT;;Fecha Sesion;{};;\r\n;;;;\r\nConcepto;Unidades;H1-H24;;\r\n",
        date.format("%d/%m/%Y")
    );
    for (i, (label, _)) in PDBC_TOT_ROWS.iter().enumerate() {
        let cells: Vec<String> = (1..=24)
            // Regional convention: decimal comma
            .map(|h| format!("{},{}", offset as i64 + i as i64 * 100 + h, 5))
            .collect();
        table.push_str(&format!("{label};MWh;{};;\r\n", cells.join(";")));
    }
    table.push_str(";;;;\r\n*");
    format!("<html><body><p>{table}</p></body></html>")
}

/// Fake site covering 2018-09-28..2018-10-03 for both variables
fn build_site() -> FakeFetcher {
    let fetcher = FakeFetcher::default();
    let newest = NaiveDate::from_ymd_opt(2018, 10, 3).unwrap();

    fetcher.insert(
        listing_url("marginalpdbc"),
        listing_page("marginalpdbc", newest, 6),
    );
    fetcher.insert(
        listing_url("pdbc_tot"),
        listing_page("pdbc_tot", newest, 6),
    );
    for i in 0..6 {
        let date = newest - chrono::Duration::days(i);
        fetcher.insert(
            day_url("marginalpdbc", date),
            format1_page("MARGINALPDBC", date, i as f64 * 10.0),
        );
        fetcher.insert(day_url("pdbc_tot", date), format2_page(date, i as f64 * 10.0));
    }
    fetcher
}

fn make_job(start: &str, end: &str, variables: &[&str], output_dir: &std::path::Path) -> DownloadJob {
    DownloadJob::new(
        variables.iter().map(|v| v.to_string()).collect(),
        DateRange::parse(start, end).unwrap(),
        output_dir.to_path_buf(),
    )
}

#[tokio::test]
async fn test_single_day_two_variables_merged() {
    let fetcher = build_site();
    let temp_dir = tempfile::TempDir::new().unwrap();
    let executor = DownloadExecutor::new(Box::new(fetcher.clone()));

    let job = make_job(
        "2018-10-01",
        "2018-10-01",
        &["marginalpdbc", "pdbc_tot"],
        temp_dir.path(),
    );
    let summary = executor.execute(&job).await.unwrap();

    assert_eq!(summary.rows, 24);
    // 2 price columns + 12 program columns - 6 excluded totals
    assert_eq!(summary.columns, 8);
    assert!(summary.path.ends_with("OMIE_20181001_20181001.csv"));

    let contents = std::fs::read_to_string(&summary.path).unwrap();
    let mut lines = contents.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("timestamp,MARGINALPDBC_1,MARGINALPDBC_2"));
    for (label, excluded) in PDBC_TOT_ROWS {
        let column = format!("{label}_MWh");
        assert_eq!(
            header.contains(&column),
            !excluded,
            "column {column} presence"
        );
    }
    assert_eq!(lines.count(), 24);

    // Listing first, then the day page, for each variable in turn
    let fetched = fetcher.fetched();
    assert_eq!(fetched.len(), 4);
    assert_eq!(fetched[0], listing_url("marginalpdbc"));
    assert!(fetched[1].contains("marginalpdbc_20181001"));
    assert_eq!(fetched[2], listing_url("pdbc_tot"));
    assert!(fetched[3].contains("pdbc_tot_20181001"));
}

#[tokio::test]
async fn test_multi_day_range_concatenates_oldest_first() {
    let fetcher = build_site();
    let temp_dir = tempfile::TempDir::new().unwrap();
    let executor = DownloadExecutor::new(Box::new(fetcher.clone()));

    let job = make_job(
        "2018-10-01",
        "2018-10-03",
        &["marginalpdbc"],
        temp_dir.path(),
    );
    let summary = executor.execute(&job).await.unwrap();

    assert_eq!(summary.rows, 72);
    let contents = std::fs::read_to_string(&summary.path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert!(lines[1].starts_with("2018-10-01 00:00:00,"));
    assert!(lines[25].starts_with("2018-10-02 00:00:00,"));
    assert!(lines[72].starts_with("2018-10-03 23:00:00,"));
}

#[tokio::test]
async fn test_rerun_produces_byte_identical_output() {
    let fetcher = build_site();
    let temp_dir = tempfile::TempDir::new().unwrap();
    let executor = DownloadExecutor::new(Box::new(fetcher.clone()));

    let job = make_job(
        "2018-10-01",
        "2018-10-02",
        &["marginalpdbc", "pdbc_tot"],
        temp_dir.path(),
    );

    let first = executor.execute(&job).await.unwrap();
    let first_bytes = std::fs::read(&first.path).unwrap();

    let second = executor.execute(&job).await.unwrap();
    let second_bytes = std::fs::read(&second.path).unwrap();

    assert_eq!(first.path, second.path);
    assert_eq!(first_bytes, second_bytes);
}

#[tokio::test]
async fn test_unknown_variable_fails_before_fetching() {
    let fetcher = build_site();
    let temp_dir = tempfile::TempDir::new().unwrap();
    let executor = DownloadExecutor::new(Box::new(fetcher.clone()));

    let job = make_job("2018-10-01", "2018-10-01", &["margnalpdbc"], temp_dir.path());
    let err = executor.execute(&job).await.unwrap_err();
    assert!(matches!(err, DownloadError::Registry(_)));
    assert!(fetcher.fetched().is_empty());
}

#[tokio::test]
async fn test_requested_shutdown_interrupts_run() {
    let fetcher = build_site();
    let temp_dir = tempfile::TempDir::new().unwrap();
    let shutdown = ShutdownCoordinator::shared();
    shutdown.request_shutdown();

    let executor = DownloadExecutor::new(Box::new(fetcher.clone())).with_shutdown(shutdown);
    let job = make_job("2018-10-01", "2018-10-01", &["marginalpdbc"], temp_dir.path());

    let err = executor.execute(&job).await.unwrap_err();
    assert!(matches!(err, DownloadError::Interrupted));
}

#[tokio::test]
async fn test_day_page_without_paragraph_is_an_error() {
    let fetcher = build_site();
    let date = NaiveDate::from_ymd_opt(2018, 10, 1).unwrap();
    fetcher.insert(
        day_url("marginalpdbc", date),
        "<html><body><div>backend error</div></body></html>",
    );

    let temp_dir = tempfile::TempDir::new().unwrap();
    let executor = DownloadExecutor::new(Box::new(fetcher.clone()));
    let job = make_job("2018-10-01", "2018-10-01", &["marginalpdbc"], temp_dir.path());

    let err = executor.execute(&job).await.unwrap_err();
    assert!(matches!(err, DownloadError::Page(_)));
}
