// File: crates/chart-core/tests/tooltip.rs
// Purpose: Tooltip gate, per-mode content, color rule, lookup-miss policy and placement.

use std::cell::RefCell;
use std::rc::Rc;

use sense_chart_core::geometry::{Point, Rect};
use sense_chart_core::theme::Theme;
use sense_chart_core::tooltip::{TooltipLabels, TooltipOptions};
use sense_chart_core::types::Timestamp;
use sense_chart_core::{
    CanonicalPoint, ChartMode, ChartModeController, CrosshairMove, CursorTooltipBinder, Display, EdgePolicy,
    PointSource, SeriesPoint, SeriesStore, TimeResolution, TimeValue, TooltipBox, TooltipState,
};

const JAN1: i64 = 1_704_067_200;
const JAN2: i64 = JAN1 + 86_400;
const BOUNDS: Rect = Rect::from_xywh(0.0, 0.0, 800.0, 600.0);

struct Fixture {
    ctl: ChartModeController,
    tooltip: Rc<RefCell<TooltipBox>>,
    binder: CursorTooltipBinder<TooltipBox>,
}

fn fixture_with(points: Vec<CanonicalPoint>, options: TooltipOptions) -> Fixture {
    let ctl = ChartModeController::new();
    let store = SeriesStore::new();
    store.replace(points);
    let tooltip = Rc::new(RefCell::new(TooltipBox::with_size(120.0, 90.0)));
    let binder = CursorTooltipBinder::new(tooltip.clone(), Rc::new(store), ctl.state(), options);
    Fixture { ctl, tooltip, binder }
}

fn fixture() -> Fixture {
    fixture_with(
        vec![
            CanonicalPoint::new(JAN1, 100.0, 110.0, 90.0, 105.0),
            CanonicalPoint::new(JAN2, 100.0, 101.0, 94.0, 95.0),
        ],
        TooltipOptions::default(),
    )
}

fn hover(x: f64, y: f64, time: impl Into<TimeValue>) -> CrosshairMove {
    CrosshairMove { point: Some(Point::new(x, y)), time: Some(time.into()), bounds: BOUNDS, scroll: Point::default() }
}

#[test]
fn pointer_outside_the_surface_hides() {
    let mut f = fixture();
    assert!(matches!(f.binder.on_crosshair_move(&hover(10.0, 10.0, JAN1)), TooltipState::Visible { .. }));

    for (x, y) in [(-1.0, 10.0), (801.0, 10.0), (10.0, -1.0), (10.0, 601.0)] {
        assert_eq!(f.binder.on_crosshair_move(&hover(x, y, JAN1)), TooltipState::Hidden);
        assert_eq!(f.tooltip.borrow().display, Display::None, "({x}, {y})");
        f.binder.on_crosshair_move(&hover(10.0, 10.0, JAN1));
    }
}

#[test]
fn edges_of_the_surface_are_inside() {
    let mut f = fixture();
    for (x, y) in [(0.0, 0.0), (800.0, 600.0)] {
        assert!(matches!(f.binder.on_crosshair_move(&hover(x, y, JAN1)), TooltipState::Visible { .. }));
    }
}

#[test]
fn missing_point_or_time_hides() {
    let mut f = fixture();
    f.binder.on_crosshair_move(&hover(10.0, 10.0, JAN1));

    let no_time = CrosshairMove { point: Some(Point::new(10.0, 10.0)), time: None, bounds: BOUNDS, scroll: Point::default() };
    assert_eq!(f.binder.on_crosshair_move(&no_time), TooltipState::Hidden);
    assert!(!f.tooltip.borrow().is_visible());

    f.binder.on_crosshair_move(&hover(10.0, 10.0, JAN1));
    let no_point = CrosshairMove { point: None, time: Some(JAN1.into()), bounds: BOUNDS, scroll: Point::default() };
    assert_eq!(f.binder.on_crosshair_move(&no_point), TooltipState::Hidden);
    assert!(!f.tooltip.borrow().is_visible());
}

#[test]
fn area_mode_shows_value_and_date() {
    let mut f = fixture();
    f.binder.on_crosshair_move(&hover(10.0, 10.0, JAN1));

    let tip = f.tooltip.borrow();
    assert!(tip.is_visible());
    let content = tip.content.as_ref().expect("content");
    assert_eq!(content.mode, ChartMode::Area);
    assert_eq!(content.lines.len(), 1);
    assert_eq!(content.text(), "105.00\n2024-01-01");
}

#[test]
fn candlestick_mode_shows_four_labelled_values() {
    let mut f = fixture();
    f.ctl.set_mode(ChartMode::Candlestick);
    f.binder.on_crosshair_move(&hover(10.0, 10.0, JAN1));

    let tip = f.tooltip.borrow();
    let content = tip.content.as_ref().expect("content");
    assert_eq!(content.mode, ChartMode::Candlestick);
    assert_eq!(content.text(), "Open = 100.00\nHigh = 110.00\nLow = 90.00\nClose = 105.00\n2024-01-01");
}

#[test]
fn candle_color_follows_close_versus_open() {
    let theme = Theme::dark();
    let mut f = fixture();
    f.ctl.set_mode(ChartMode::Candlestick);

    f.binder.on_crosshair_move(&hover(10.0, 10.0, JAN1));
    let up = f.tooltip.borrow().content.clone().expect("content");
    assert!(up.lines.iter().all(|l| l.color == Some(theme.candle_up)));

    f.binder.on_crosshair_move(&hover(10.0, 10.0, JAN2));
    let down = f.tooltip.borrow().content.clone().expect("content");
    assert!(down.lines.iter().all(|l| l.color == Some(theme.candle_down)));
}

#[test]
fn flat_candle_counts_as_up() {
    let mut f = fixture_with(vec![CanonicalPoint::new(JAN1, 100.0, 100.0, 100.0, 100.0)], TooltipOptions::default());
    f.ctl.set_mode(ChartMode::Candlestick);
    f.binder.on_crosshair_move(&hover(10.0, 10.0, JAN1));
    let content = f.tooltip.borrow().content.clone().expect("content");
    assert_eq!(content.lines[0].color, Some(Theme::dark().candle_up));
}

#[test]
fn lookup_miss_leaves_prior_state() {
    let mut f = fixture();

    // From hidden: stays hidden, nothing written.
    assert_eq!(f.binder.on_crosshair_move(&hover(10.0, 10.0, JAN1 + 5 * 86_400)), TooltipState::Hidden);
    assert_eq!(*f.tooltip.borrow(), TooltipBox::with_size(120.0, 90.0));

    // From visible: content and position are kept.
    let shown = f.binder.on_crosshair_move(&hover(30.0, 40.0, JAN1));
    let snapshot = f.tooltip.borrow().clone();
    assert_eq!(f.binder.on_crosshair_move(&hover(300.0, 400.0, JAN1 - 86_400)), shown);
    assert_eq!(*f.tooltip.borrow(), snapshot);
}

struct BrokenSource;

impl PointSource for BrokenSource {
    fn point_at(&self, _mode: ChartMode, time: Timestamp) -> Option<SeriesPoint> {
        Some(SeriesPoint::Area { time, value: f64::NAN })
    }
}

#[test]
fn malformed_points_are_swallowed() {
    let ctl = ChartModeController::new();
    let tooltip = Rc::new(RefCell::new(TooltipBox::default()));
    let mut binder = CursorTooltipBinder::new(tooltip.clone(), Rc::new(BrokenSource), ctl.state(), TooltipOptions::default());

    assert_eq!(binder.on_crosshair_move(&hover(10.0, 10.0, JAN1)), TooltipState::Hidden);
    assert!(tooltip.borrow().content.is_none());
}

#[test]
fn placement_adds_surface_origin_and_scroll() {
    let mut f = fixture();
    let evt = CrosshairMove {
        point: Some(Point::new(100.0, 50.0)),
        time: Some(JAN1.into()),
        bounds: Rect::from_xywh(10.0, 20.0, 800.0, 600.0),
        scroll: Point::new(5.0, 7.0),
    };
    assert_eq!(f.binder.on_crosshair_move(&evt), TooltipState::Visible { left: 115.0, top: 77.0 });
    let tip = f.tooltip.borrow();
    assert_eq!((tip.left, tip.top), (115.0, 77.0));
}

#[test]
fn every_valid_hover_repositions() {
    let mut f = fixture();
    f.binder.on_crosshair_move(&hover(10.0, 10.0, JAN1));
    f.binder.on_crosshair_move(&hover(20.0, 30.0, JAN2));
    let tip = f.tooltip.borrow();
    assert_eq!((tip.left, tip.top), (20.0, 30.0));
    assert_eq!(tip.content.as_ref().map(|c| c.date.as_str()), Some("2024-01-02"));
}

#[test]
fn flip_policy_keeps_tooltip_inside_near_edges() {
    let options = TooltipOptions { edge_policy: EdgePolicy::Flip { margin: 5.0 }, ..TooltipOptions::default() };
    let mut f = fixture_with(vec![CanonicalPoint::new(JAN1, 1.0, 1.0, 1.0, 1.0)], options);

    // Tooltip is 120x90 on an 800x600 surface.
    assert_eq!(f.binder.on_crosshair_move(&hover(50.0, 50.0, JAN1)), TooltipState::Visible { left: 50.0, top: 50.0 });
    assert_eq!(
        f.binder.on_crosshair_move(&hover(750.0, 580.0, JAN1)),
        TooltipState::Visible { left: 625.0, top: 485.0 }
    );
}

#[test]
fn every_time_representation_hits_the_same_point() {
    let mut f = fixture();
    for time in [
        TimeValue::Timestamp(JAN2),
        TimeValue::from("2024-01-02"),
        TimeValue::BusinessDay { year: 2024, month: 1, day: 2 },
    ] {
        f.binder.on_crosshair_move(&hover(10.0, 10.0, time.clone()));
        let content = f.tooltip.borrow().content.clone().expect("content");
        assert_eq!(content.text(), "95.00\n2024-01-02", "{time:?}");
    }
}

#[test]
fn intraday_times_key_to_the_day_of_the_data() {
    let mut f = fixture();
    for time in [TimeValue::from("2024-01-02T10:00:00Z"), TimeValue::Timestamp(JAN2 + 3600)] {
        assert!(matches!(f.binder.on_crosshair_move(&hover(10.0, 10.0, time.clone())), TooltipState::Visible { .. }));
        let content = f.tooltip.borrow().content.clone().expect("content");
        assert_eq!(content.text(), "95.00\n2024-01-02", "{time:?}");
    }
}

#[test]
fn exact_resolution_needs_an_exact_time() {
    let options = TooltipOptions { resolution: TimeResolution::Exact, ..TooltipOptions::default() };
    let mut f = fixture_with(vec![CanonicalPoint::new(JAN1 + 3600, 1.0, 1.0, 1.0, 1.0)], options);

    assert_eq!(f.binder.on_crosshair_move(&hover(10.0, 10.0, JAN1)), TooltipState::Hidden);
    assert!(matches!(f.binder.on_crosshair_move(&hover(10.0, 10.0, "2024-01-01T01:00:00Z")), TooltipState::Visible { .. }));
    let content = f.tooltip.borrow().content.clone().expect("content");
    assert_eq!(content.date, "2024-01-01 01:00");
}

#[test]
fn html_uses_labels_and_colors() {
    let options = TooltipOptions { labels: TooltipLabels::traditional_chinese(), ..TooltipOptions::default() };
    let mut f = fixture_with(vec![CanonicalPoint::new(JAN1, 100.0, 110.0, 90.0, 105.0)], options);
    f.ctl.set_mode(ChartMode::Candlestick);
    f.binder.on_crosshair_move(&hover(10.0, 10.0, JAN1));

    let html = f.tooltip.borrow().content.as_ref().expect("content").to_html();
    assert!(html.contains("<div>開 = <span style=\"color: #26a69a;\">100.00</span></div>"), "{html}");
    assert!(html.contains("<div>收 = <span style=\"color: #26a69a;\">105.00</span></div>"), "{html}");
    assert!(html.ends_with("2024-01-01</div>"), "{html}");
}
