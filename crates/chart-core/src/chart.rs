// File: crates/chart-core/src/chart.rs
// Summary: Headless chart surface: two renderings over one point slice, crosshair dispatch.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::format::PriceFormatter;
use crate::geometry::{Point, Rect};
use crate::mode::{ChartMode, ModeState};
use crate::normalize::TimeResolution;
use crate::scale::TimeScale;
use crate::series::{CanonicalPoint, PointSource, Series, SeriesPoint};
use crate::theme::Theme;
use crate::tooltip::{CrosshairHandler, CrosshairMove, CrosshairSource, EdgePolicy, SubscriptionId, TooltipLabels, TooltipOptions};
use crate::types::{TimeValue, Timestamp, HEIGHT, WIDTH};

#[derive(Clone, Debug)]
pub struct ChartOptions {
    pub width: f64,
    pub height: f64,
    /// Surface origin in viewport coordinates.
    pub origin: Point,
    pub theme: Theme,
    pub formatter: PriceFormatter,
    pub labels: TooltipLabels,
    pub edge_policy: EdgePolicy,
    pub resolution: TimeResolution,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            origin: Point::default(),
            theme: Theme::dark(),
            formatter: PriceFormatter::en_us(),
            labels: TooltipLabels::english(),
            edge_policy: EdgePolicy::None,
            resolution: TimeResolution::Day,
        }
    }
}

impl ChartOptions {
    pub fn tooltip(&self) -> TooltipOptions {
        TooltipOptions {
            theme: self.theme,
            formatter: self.formatter,
            labels: self.labels,
            edge_policy: self.edge_policy,
            resolution: self.resolution,
        }
    }
}

struct Renderings {
    area: Series,
    candlestick: Series,
}

impl Renderings {
    fn from_points(points: Rc<[CanonicalPoint]>) -> Self {
        Self {
            area: Series::new(ChartMode::Area, points.clone()),
            candlestick: Series::new(ChartMode::Candlestick, points),
        }
    }

    fn get(&self, mode: ChartMode) -> &Series {
        match mode {
            ChartMode::Area => &self.area,
            ChartMode::Candlestick => &self.candlestick,
        }
    }
}

/// Shared handle to the data of both renderings.
#[derive(Clone)]
pub struct SeriesStore {
    inner: Rc<RefCell<Renderings>>,
}

impl SeriesStore {
    pub fn new() -> Self {
        Self { inner: Rc::new(RefCell::new(Renderings::from_points(Rc::from(Vec::<CanonicalPoint>::new())))) }
    }

    /// Hand a new canonical sequence to both renderings.
    pub fn replace(&self, points: Vec<CanonicalPoint>) {
        *self.inner.borrow_mut() = Renderings::from_points(Rc::from(points));
    }

    pub fn series(&self, mode: ChartMode) -> Series { self.inner.borrow().get(mode).clone() }

    pub fn len(&self) -> usize { self.inner.borrow().area.len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn time_at(&self, index: usize) -> Option<Timestamp> {
        self.inner.borrow().area.points().get(index).map(|p| p.time)
    }

    pub fn index_of(&self, time: Timestamp) -> Option<usize> { self.inner.borrow().area.index_of(time) }
}

impl Default for SeriesStore {
    fn default() -> Self { Self::new() }
}

impl PointSource for SeriesStore {
    fn point_at(&self, mode: ChartMode, time: Timestamp) -> Option<SeriesPoint> {
        self.inner.borrow().get(mode).point_at(time)
    }
}

pub struct Chart {
    store: SeriesStore,
    mode: ModeState,
    bounds: Rect,
    scroll: Point,
    time_scale: TimeScale,
    subscribers: Vec<(SubscriptionId, CrosshairHandler)>,
    next_id: u64,
}

impl Chart {
    pub fn new(opts: &ChartOptions, mode: ModeState) -> Self {
        Self {
            store: SeriesStore::new(),
            mode,
            bounds: Rect::from_xywh(opts.origin.x, opts.origin.y, opts.width, opts.height),
            scroll: Point::default(),
            time_scale: TimeScale::fit(opts.width, 0),
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    /// Feed both renderings the same canonical points and refit the time scale.
    pub fn set_data(&mut self, points: Vec<CanonicalPoint>) {
        debug!(points = points.len(), "chart data replaced");
        self.store.replace(points);
        self.refit();
    }

    pub fn store(&self) -> SeriesStore { self.store.clone() }

    pub fn series(&self, mode: ChartMode) -> Series { self.store.series(mode) }

    pub fn is_visible(&self, mode: ChartMode) -> bool { self.mode.is_visible(mode) }

    pub fn client_rect(&self) -> Rect { self.bounds }

    pub fn scroll_offset(&self) -> Point { self.scroll }

    pub fn set_scroll_offset(&mut self, scroll: Point) { self.scroll = scroll; }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.bounds.width = width;
        self.bounds.height = height;
        self.refit();
    }

    pub fn move_to(&mut self, origin: Point) {
        self.bounds.x = origin.x;
        self.bounds.y = origin.y;
    }

    pub fn time_scale(&self) -> TimeScale { self.time_scale }

    /// Surface-local x of the bar at `time`.
    pub fn coordinate_of(&self, time: Timestamp) -> Option<f64> {
        self.store.index_of(time).map(|i| self.time_scale.to_px(i as f64))
    }

    /// Time of the bar nearest to surface-local `x`.
    pub fn time_at(&self, x: f64) -> Option<Timestamp> {
        self.time_scale.index_at(x, self.store.len()).and_then(|i| self.store.time_at(i))
    }

    /// Pointer moved to surface-local `(x, y)`.
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        let time = self.time_at(x).map(TimeValue::Timestamp);
        trace!(x, y, ?time, "pointer move");
        self.dispatch(CrosshairMove { point: Some(Point::new(x, y)), time, bounds: self.bounds, scroll: self.scroll });
    }

    pub fn pointer_leave(&mut self) {
        self.dispatch(CrosshairMove { point: None, time: None, bounds: self.bounds, scroll: self.scroll });
    }

    fn dispatch(&mut self, evt: CrosshairMove) {
        for (_, handler) in self.subscribers.iter_mut() {
            handler(&evt);
        }
    }

    fn refit(&mut self) {
        self.time_scale = TimeScale::fit(self.bounds.width, self.store.len());
    }
}

impl CrosshairSource for Chart {
    fn subscribe_crosshair_move(&mut self, handler: CrosshairHandler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, handler));
        id
    }

    fn unsubscribe_crosshair_move(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }
}
