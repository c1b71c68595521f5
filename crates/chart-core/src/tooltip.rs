// File: crates/chart-core/src/tooltip.rs
// Summary: Crosshair -> tooltip binding: visibility gate, per-mode lookup, formatting, placement.
// Notes:
// - A lookup miss or a malformed point leaves the tooltip exactly as it was.
//   Only an invalid hover (no point/time, or pointer outside the surface) hides it.
// - Placement has no edge avoidance unless `EdgePolicy::Flip` is selected.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::DateTime;
use tracing::trace;

use crate::format::{format_date, resolve_time, PriceFormatter};
use crate::geometry::{clamp, Point, Rect};
use crate::mode::{ChartMode, ModeState};
use crate::normalize::TimeResolution;
use crate::series::{PointSource, SeriesPoint};
use crate::theme::{Color, Theme};
use crate::types::TimeValue;

/// CSS-like display flag of the tooltip element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Display {
    #[default]
    None,
    Block,
}

/// A positionable, styleable overlay.
pub trait TooltipElement {
    fn set_display(&mut self, display: Display);
    /// Absolute document coordinates of the top-left corner.
    fn set_position(&mut self, left: f64, top: f64);
    fn set_content(&mut self, content: TooltipContent);
    /// Rendered (width, height); only consulted by [`EdgePolicy::Flip`].
    fn size(&self) -> (f64, f64);
}

/// In-memory tooltip element; records whatever the binder writes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TooltipBox {
    pub display: Display,
    pub left: f64,
    pub top: f64,
    pub content: Option<TooltipContent>,
    pub width: f64,
    pub height: f64,
}

impl TooltipBox {
    pub fn with_size(width: f64, height: f64) -> Self {
        Self { width, height, ..Self::default() }
    }
    pub fn is_visible(&self) -> bool { self.display == Display::Block }
}

impl TooltipElement for TooltipBox {
    fn set_display(&mut self, display: Display) { self.display = display; }
    fn set_position(&mut self, left: f64, top: f64) {
        self.left = left;
        self.top = top;
    }
    fn set_content(&mut self, content: TooltipContent) { self.content = Some(content); }
    fn size(&self) -> (f64, f64) { (self.width, self.height) }
}

/// Labels of the four candlestick rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TooltipLabels {
    pub open: &'static str,
    pub high: &'static str,
    pub low: &'static str,
    pub close: &'static str,
}

impl TooltipLabels {
    pub const fn english() -> Self { Self { open: "Open", high: "High", low: "Low", close: "Close" } }
    pub const fn traditional_chinese() -> Self { Self { open: "開", high: "高", low: "低", close: "收" } }
}

impl Default for TooltipLabels {
    fn default() -> Self { Self::english() }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TooltipLine {
    pub label: Option<&'static str>,
    pub value: String,
    pub color: Option<Color>,
}

/// Formatted tooltip body: value line(s) followed by a date line.
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipContent {
    pub mode: ChartMode,
    pub lines: Vec<TooltipLine>,
    pub date: String,
    pub date_color: Color,
}

impl TooltipContent {
    /// Plain-text rendering, one line per row, date last.
    pub fn text(&self) -> String {
        let mut out: Vec<String> = self
            .lines
            .iter()
            .map(|l| match l.label {
                Some(label) => format!("{label} = {}", l.value),
                None => l.value.clone(),
            })
            .collect();
        out.push(self.date.clone());
        out.join("\n")
    }

    /// HTML fragment for a DOM-backed tooltip element.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for line in &self.lines {
            let value = match line.color {
                Some(c) => format!("<span style=\"color: {c};\">{}</span>", line.value),
                None => line.value.clone(),
            };
            match line.label {
                Some(label) => html.push_str(&format!("<div>{label} = {value}</div>")),
                None => html.push_str(&format!("<div>{value}</div>")),
            }
        }
        html.push_str(&format!(
            "<div style=\"font-size: 8px; color: {}; text-align: center; margin-top: 5px;\">{}</div>",
            self.date_color, self.date
        ));
        html
    }
}

/// How the tooltip is kept near the surface edges.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum EdgePolicy {
    /// Anchor the top-left corner at the pointer.
    #[default]
    None,
    /// Flip left of / above the pointer when the tooltip would overflow the
    /// right / bottom edge, keeping `margin` px between pointer and tooltip.
    Flip { margin: f64 },
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TooltipOptions {
    pub theme: Theme,
    pub formatter: PriceFormatter,
    pub labels: TooltipLabels,
    pub edge_policy: EdgePolicy,
    /// Resolution the data was keyed at; hovered times are keyed the same way.
    pub resolution: TimeResolution,
}

/// Visibility state machine of the tooltip.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum TooltipState {
    #[default]
    Hidden,
    Visible { left: f64, top: f64 },
}

/// Pointer-move notification from a chart surface.
#[derive(Clone, Debug, PartialEq)]
pub struct CrosshairMove {
    /// Pointer position relative to the surface origin.
    pub point: Option<Point>,
    /// Hovered time, when the pointer resolves to one.
    pub time: Option<TimeValue>,
    /// Surface bounding client rect at dispatch.
    pub bounds: Rect,
    /// Document scroll offset at dispatch.
    pub scroll: Point,
}

pub type CrosshairHandler = Box<dyn FnMut(&CrosshairMove)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Something that emits crosshair-move notifications.
pub trait CrosshairSource {
    fn subscribe_crosshair_move(&mut self, handler: CrosshairHandler) -> SubscriptionId;
    /// Returns false when `id` was not subscribed.
    fn unsubscribe_crosshair_move(&mut self, id: SubscriptionId) -> bool;
}

pub struct CursorTooltipBinder<T: TooltipElement> {
    tooltip: Rc<RefCell<T>>,
    source: Rc<dyn PointSource>,
    mode: ModeState,
    options: TooltipOptions,
    state: TooltipState,
}

impl<T: TooltipElement + 'static> CursorTooltipBinder<T> {
    pub fn new(tooltip: Rc<RefCell<T>>, source: Rc<dyn PointSource>, mode: ModeState, options: TooltipOptions) -> Self {
        Self { tooltip, source, mode, options, state: TooltipState::Hidden }
    }

    /// Subscribe a new binder to `surface`; drop the returned id to keep it, or
    /// pass it to `unsubscribe_crosshair_move` to unbind.
    pub fn bind<S: CrosshairSource + ?Sized>(
        surface: &mut S,
        tooltip: Rc<RefCell<T>>,
        source: Rc<dyn PointSource>,
        mode: ModeState,
        options: TooltipOptions,
    ) -> SubscriptionId {
        let mut binder = Self::new(tooltip, source, mode, options);
        surface.subscribe_crosshair_move(Box::new(move |evt| {
            binder.on_crosshair_move(evt);
        }))
    }

    pub fn state(&self) -> TooltipState { self.state }

    /// Handle one pointer-move notification; returns the resulting state.
    pub fn on_crosshair_move(&mut self, evt: &CrosshairMove) -> TooltipState {
        let (point, time) = match (evt.point, evt.time.as_ref()) {
            (Some(p), Some(t)) if evt.bounds.contains_local(p) => (p, t),
            _ => {
                self.hide();
                return self.state;
            }
        };

        let Some(content) = self.resolve_content(time) else {
            return self.state;
        };

        let (left, top) = self.place(point, evt);
        {
            let mut tooltip = self.tooltip.borrow_mut();
            tooltip.set_content(content);
            tooltip.set_position(left, top);
            tooltip.set_display(Display::Block);
        }
        self.state = TooltipState::Visible { left, top };
        self.state
    }

    fn hide(&mut self) {
        self.tooltip.borrow_mut().set_display(Display::None);
        self.state = TooltipState::Hidden;
    }

    fn resolve_content(&self, time: &TimeValue) -> Option<TooltipContent> {
        let Some(dt) = resolve_time(time) else {
            trace!(?time, "crosshair time did not resolve");
            return None;
        };
        let mode = self.mode.mode();
        let key = self.options.resolution.key(dt.and_utc().timestamp())?;
        let point = match self.source.point_at(mode, key) {
            Some(p) if p.is_finite() => p,
            other => {
                trace!(?mode, ?time, found = other.is_some(), "no usable point under crosshair");
                return None;
            }
        };
        let keyed = DateTime::from_timestamp(point.time(), 0).map_or(dt, |t| t.naive_utc());
        Some(self.format(mode, &point, format_date(&keyed)))
    }

    fn format(&self, mode: ChartMode, point: &SeriesPoint, date: String) -> TooltipContent {
        let fmt = &self.options.formatter;
        let theme = &self.options.theme;
        let lines = match *point {
            SeriesPoint::Area { value, .. } => vec![TooltipLine { label: None, value: fmt.format(value), color: None }],
            SeriesPoint::Candle { open, high, low, close, .. } => {
                let color = Some(theme.candle_color(open, close));
                let labels = &self.options.labels;
                [(labels.open, open), (labels.high, high), (labels.low, low), (labels.close, close)]
                    .into_iter()
                    .map(|(label, v)| TooltipLine { label: Some(label), value: fmt.format(v), color })
                    .collect()
            }
        };
        TooltipContent { mode, lines, date, date_color: theme.date_label }
    }

    fn place(&self, point: Point, evt: &CrosshairMove) -> (f64, f64) {
        let (x, y) = match self.options.edge_policy {
            EdgePolicy::None => (point.x, point.y),
            EdgePolicy::Flip { margin } => {
                let (w, h) = self.tooltip.borrow().size();
                let mut x = point.x;
                let mut y = point.y;
                if x > evt.bounds.width - w {
                    x = point.x - margin - w;
                }
                if y > evt.bounds.height - h {
                    y = point.y - h - margin;
                }
                (clamp(x, 0.0, (evt.bounds.width - w).max(0.0)), clamp(y, 0.0, (evt.bounds.height - h).max(0.0)))
            }
        };
        (x + evt.bounds.x + evt.scroll.x, y + evt.bounds.y + evt.scroll.y)
    }
}
