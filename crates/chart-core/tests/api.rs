// File: crates/chart-core/tests/api.rs
// Purpose: Data API URL building, timeframe rules and discovery over a stub transport.

use std::collections::HashMap;

use chrono::{TimeZone, Utc};
use sense_chart_core::api::TimeUnit;
use sense_chart_core::{
    ApiClient, ChartError, ChartResult, DataApi, Environment, FeedSource, KlineRequest, MemoryStore, RemoteDataApi,
    TimeWindow, Timeframe, UserConfig,
};
use url::Url;

fn client() -> ApiClient {
    ApiClient::new("http://localhost:8086").expect("base url")
}

fn query(url: &Url, key: &str) -> Option<String> {
    url.query_pairs().find(|(k, _)| k == key).map(|(_, v)| v.into_owned())
}

#[test]
fn discovery_urls() {
    let c = client();
    assert_eq!(c.endpoints_url().as_str(), "http://localhost:8086/data/endpoints");
    assert_eq!(c.symbols_url("binance").as_str(), "http://localhost:8086/data/endpoints/binance/symbols");
}

#[test]
fn base_url_path_is_kept() {
    for base in ["http://host/api", "http://host/api/"] {
        let c = ApiClient::new(base).expect("base url");
        assert_eq!(c.endpoints_url().as_str(), "http://host/api/data/endpoints", "{base}");
    }
}

#[test]
fn kline_url_with_epoch_window() {
    let req = KlineRequest::new(
        "binance",
        "BTC/USDT",
        TimeWindow::EpochMillis { since: 1_704_067_200_000, until: 1_704_153_600_000 },
    );
    assert_eq!(
        client().kline_url(&req).as_str(),
        "http://localhost:8086/data/endpoints/binance/kline?symbol=BTC%2FUSDT&since=1704067200000&until=1704153600000&timeframe=1h"
    );
}

#[test]
fn kline_url_with_iso_window() {
    let begin = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().expect("begin");
    let end = Utc.with_ymd_and_hms(2024, 2, 1, 12, 30, 0).single().expect("end");
    let req = KlineRequest::new("binance", "ETHUSDT", TimeWindow::Iso { begin, end }).with_timeframe(Timeframe::parse("15m").expect("tf"));

    let url = client().kline_url(&req);
    assert_eq!(query(&url, "begin").as_deref(), Some("2024-01-01T00:00:00.000Z"));
    assert_eq!(query(&url, "end").as_deref(), Some("2024-02-01T12:30:00.000Z"));
    assert_eq!(query(&url, "timeframe").as_deref(), Some("15m"));
    assert_eq!(query(&url, "since"), None);
}

#[test]
fn daily_only_endpoint_forces_one_day() {
    let window = TimeWindow::EpochMillis { since: 0, until: 1 };
    let req = KlineRequest::new("yfinance", "AAPL", window).with_timeframe(Timeframe::ONE_HOUR);
    assert_eq!(req.effective_timeframe(), Timeframe::ONE_DAY);
    assert_eq!(query(&client().kline_url(&req), "timeframe").as_deref(), Some("1d"));

    assert_eq!(KlineRequest::new("binance", "X", window).effective_timeframe(), Timeframe::ONE_HOUR);
    assert_eq!(Timeframe::default_for("yfinance"), Timeframe::ONE_DAY);
}

#[test]
fn timeframe_bounds() {
    assert_eq!(Timeframe::parse("1m"), Some(Timeframe { count: 1, unit: TimeUnit::Minute }));
    assert_eq!(Timeframe::parse("59m"), Some(Timeframe { count: 59, unit: TimeUnit::Minute }));
    assert_eq!(Timeframe::parse("23h"), Some(Timeframe { count: 23, unit: TimeUnit::Hour }));
    assert_eq!(Timeframe::parse("7d"), Some(Timeframe { count: 7, unit: TimeUnit::Day }));
    for bad in ["", "h", "0m", "60m", "24h", "8d", "1w", "-1h", "+5m", " +5m", "1.5h", "1é"] {
        assert_eq!(Timeframe::parse(bad), None, "{bad}");
    }
    assert!(Timeframe::parse("4h").is_some_and(|t| t.is_intraday()));
    assert!(!Timeframe::ONE_DAY.is_intraday());
    assert_eq!(Timeframe::parse(" 30m ").map(|t| t.to_string()).as_deref(), Some("30m"));
}

#[test]
fn invalid_base_urls_are_rejected() {
    assert!(matches!(ApiClient::new("not a url"), Err(ChartError::Url(_))));
    assert!(matches!(ApiClient::new("mailto:ops@example.com"), Err(ChartError::Url(_))));
}

#[test]
fn client_follows_config_or_default() -> anyhow::Result<()> {
    let server = UserConfig::new(Environment::Server, MemoryStore::default())?;
    assert_eq!(ApiClient::from_config(&server)?.base().as_str(), "http://localhost:8086/");

    let mut client_cfg = UserConfig::new(Environment::Client, MemoryStore::default())?;
    client_cfg.set("apiUrl", "https://charts.example.com/v2/")?;
    let c = ApiClient::from_config(&client_cfg)?;
    assert_eq!(c.endpoints_url().as_str(), "https://charts.example.com/v2/data/endpoints");
    Ok(())
}

#[derive(Default)]
struct StubFeed {
    bodies: HashMap<String, String>,
}

impl FeedSource for StubFeed {
    fn fetch(&self, url: &Url) -> ChartResult<String> {
        self.bodies.get(url.as_str()).cloned().ok_or_else(|| ChartError::Fetch(format!("404 {url}")))
    }
}

#[test]
fn discovery_over_a_stub_transport() {
    let mut feed = StubFeed::default();
    feed.bodies.insert("http://localhost:8086/data/endpoints".into(), r#"["binance","yfinance"]"#.into());
    feed.bodies.insert("http://localhost:8086/data/endpoints/binance/symbols".into(), r#"["BTCUSDT"]"#.into());
    feed.bodies.insert("http://localhost:8086/data/endpoints/yfinance/symbols".into(), "{}".into());
    let api = RemoteDataApi::new(client(), feed);

    assert_eq!(api.endpoints().expect("endpoints"), vec!["binance", "yfinance"]);
    assert_eq!(api.symbols("binance").expect("symbols"), vec!["BTCUSDT"]);
    assert!(matches!(api.symbols("yfinance"), Err(ChartError::Json(_))));
    assert!(matches!(api.symbols("kraken"), Err(ChartError::Fetch(_))));
}
