// File: crates/chart-core/src/api.rs
// Summary: Remote data API contract: endpoint/symbol discovery and kline URL building.

use chrono::{DateTime, SecondsFormat, Utc};
use url::Url;

use crate::config::{UserConfig, DEFAULT_API_URL};
use crate::error::{ChartError, ChartResult};
use crate::feed::FeedSource;

/// Endpoint that only serves daily (or coarser) bars.
pub const DAILY_ONLY_ENDPOINT: &str = "yfinance";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeUnit {
    Minute,
    Hour,
    Day,
}

/// Bar timeframe: `1m..59m`, `1h..23h`, `1d..7d`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timeframe {
    pub count: u32,
    pub unit: TimeUnit,
}

impl Timeframe {
    pub const ONE_HOUR: Timeframe = Timeframe { count: 1, unit: TimeUnit::Hour };
    pub const ONE_DAY: Timeframe = Timeframe { count: 1, unit: TimeUnit::Day };

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let (digits, unit) = s.split_at(s.char_indices().last()?.0);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let count: u32 = digits.parse().ok()?;
        let (unit, max) = match unit {
            "m" => (TimeUnit::Minute, 59),
            "h" => (TimeUnit::Hour, 23),
            "d" => (TimeUnit::Day, 7),
            _ => return None,
        };
        (1..=max).contains(&count).then_some(Self { count, unit })
    }

    pub fn is_intraday(&self) -> bool { self.unit != TimeUnit::Day }

    /// Default timeframe of an endpoint.
    pub fn default_for(endpoint: &str) -> Self {
        if endpoint == DAILY_ONLY_ENDPOINT { Self::ONE_DAY } else { Self::ONE_HOUR }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let unit = match self.unit {
            TimeUnit::Minute => "m",
            TimeUnit::Hour => "h",
            TimeUnit::Day => "d",
        };
        write!(f, "{}{unit}", self.count)
    }
}

/// Requested time window, in one of the two query shapes the API accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeWindow {
    /// `begin`/`end` as ISO-8601 UTC strings.
    Iso { begin: DateTime<Utc>, end: DateTime<Utc> },
    /// `since`/`until` as epoch milliseconds.
    EpochMillis { since: i64, until: i64 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KlineRequest {
    pub endpoint: String,
    pub symbol: String,
    pub window: TimeWindow,
    pub timeframe: Option<Timeframe>,
}

impl KlineRequest {
    pub fn new(endpoint: impl Into<String>, symbol: impl Into<String>, window: TimeWindow) -> Self {
        Self { endpoint: endpoint.into(), symbol: symbol.into(), window, timeframe: None }
    }

    pub fn with_timeframe(mut self, timeframe: Timeframe) -> Self {
        self.timeframe = Some(timeframe);
        self
    }

    /// Requested timeframe, or the endpoint default. Daily-only endpoints always get `1d`.
    pub fn effective_timeframe(&self) -> Timeframe {
        if self.endpoint == DAILY_ONLY_ENDPOINT {
            return Timeframe::ONE_DAY;
        }
        self.timeframe.unwrap_or_else(|| Timeframe::default_for(&self.endpoint))
    }
}

/// Builds API URLs relative to the configured base.
#[derive(Clone, Debug)]
pub struct ApiClient {
    base: Url,
}

impl ApiClient {
    pub fn new(base: &str) -> ChartResult<Self> {
        let base = Url::parse(base)?;
        if base.cannot_be_a_base() {
            return Err(ChartError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }
        Ok(Self { base })
    }

    /// Client for the `apiUrl` preference, or the default when it is unset.
    pub fn from_config(cfg: &UserConfig) -> ChartResult<Self> {
        Self::new(cfg.api_url().unwrap_or(DEFAULT_API_URL))
    }

    pub fn base(&self) -> &Url { &self.base }

    /// `{api}/data/endpoints`
    pub fn endpoints_url(&self) -> Url { self.join(&["data", "endpoints"]) }

    /// `{api}/data/endpoints/{endpoint}/symbols`
    pub fn symbols_url(&self, endpoint: &str) -> Url { self.join(&["data", "endpoints", endpoint, "symbols"]) }

    /// `{api}/data/endpoints/{endpoint}/kline?symbol=..&<window>&timeframe=..`
    pub fn kline_url(&self, req: &KlineRequest) -> Url {
        let mut url = self.join(&["data", "endpoints", &req.endpoint, "kline"]);
        {
            let mut q = url.query_pairs_mut();
            q.append_pair("symbol", &req.symbol);
            match req.window {
                TimeWindow::Iso { begin, end } => {
                    q.append_pair("begin", &begin.to_rfc3339_opts(SecondsFormat::Millis, true));
                    q.append_pair("end", &end.to_rfc3339_opts(SecondsFormat::Millis, true));
                }
                TimeWindow::EpochMillis { since, until } => {
                    q.append_pair("since", &since.to_string());
                    q.append_pair("until", &until.to_string());
                }
            }
            q.append_pair("timeframe", &req.effective_timeframe().to_string());
        }
        url
    }

    fn join(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        // Checked in `new`: the base can carry path segments.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

/// Decode a JSON array of strings, the body shape of both discovery calls.
pub fn parse_string_list(body: &str) -> ChartResult<Vec<String>> {
    Ok(serde_json::from_str(body)?)
}

/// Endpoint and symbol discovery.
pub trait DataApi {
    fn endpoints(&self) -> ChartResult<Vec<String>>;
    fn symbols(&self, endpoint: &str) -> ChartResult<Vec<String>>;
}

/// Discovery over any [`FeedSource`] transport.
pub struct RemoteDataApi<F: FeedSource> {
    client: ApiClient,
    source: F,
}

impl<F: FeedSource> RemoteDataApi<F> {
    pub fn new(client: ApiClient, source: F) -> Self { Self { client, source } }

    pub fn client(&self) -> &ApiClient { &self.client }
}

impl<F: FeedSource> DataApi for RemoteDataApi<F> {
    fn endpoints(&self) -> ChartResult<Vec<String>> {
        parse_string_list(&self.source.fetch(&self.client.endpoints_url())?)
    }

    fn symbols(&self, endpoint: &str) -> ChartResult<Vec<String>> {
        parse_string_list(&self.source.fetch(&self.client.symbols_url(endpoint))?)
    }
}
