// File: crates/chart-core/src/lib.rs
// Summary: Core library entry point; exports the chart synchronization API.

pub mod api;
pub mod chart;
pub mod config;
pub mod error;
pub mod feed;
pub mod format;
pub mod geometry;
pub mod mode;
pub mod normalize;
pub mod scale;
pub mod series;
pub mod session;
pub mod theme;
pub mod tooltip;
pub mod types;

pub use api::{ApiClient, DataApi, KlineRequest, RemoteDataApi, TimeWindow, Timeframe};
pub use chart::{Chart, ChartOptions, SeriesStore};
pub use config::{Environment, JsonFileStore, MemoryStore, PreferenceStore, UserConfig};
pub use error::{ChartError, ChartResult};
pub use feed::{read_rows, FeedSource, FileFeed};
pub use format::PriceFormatter;
pub use mode::{ChartMode, ChartModeController, ModeState, Visibility};
pub use normalize::{normalize, normalize_with, NormalizeOptions, Normalized, RawRow, RowError, TimeResolution};
pub use series::{CanonicalPoint, PointSource, Series, SeriesPoint};
pub use session::{ChartSession, LoadReport, LoadTicket};
pub use theme::Theme;
pub use tooltip::{CrosshairMove, CursorTooltipBinder, Display, EdgePolicy, TooltipBox, TooltipContent, TooltipElement, TooltipState};
pub use types::TimeValue;
