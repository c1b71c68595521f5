// File: crates/chart-core/src/session.rs
// Summary: Wires feed loading, normalization, the chart surface, mode control and the tooltip.
// Notes:
// - Loads are one-shot and sequenced by ticket. Beginning a load (or cancelling)
//   supersedes any earlier ticket; a stale completion is rejected untouched.
// - Chart data is replaced only after a load fully succeeds.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info};
use url::Url;

use crate::chart::{Chart, ChartOptions};
use crate::error::{ChartError, ChartResult};
use crate::feed::{read_rows, FeedSource};
use crate::mode::ChartModeController;
use crate::normalize::{normalize_with, NormalizeOptions, RawRow, RejectedRow};
use crate::tooltip::{CrosshairSource, CursorTooltipBinder, SubscriptionId, TooltipElement};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Outcome of a successful load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadReport {
    pub points: usize,
    pub rejected: Vec<RejectedRow>,
}

pub struct ChartSession {
    options: ChartOptions,
    controller: ChartModeController,
    chart: Chart,
    generation: u64,
    pending: Option<u64>,
}

impl ChartSession {
    pub fn new(options: ChartOptions) -> Self {
        let controller = ChartModeController::new();
        let chart = Chart::new(&options, controller.state());
        Self { options, controller, chart, generation: 0, pending: None }
    }

    pub fn options(&self) -> &ChartOptions { &self.options }
    pub fn controller(&self) -> &ChartModeController { &self.controller }
    pub fn chart(&self) -> &Chart { &self.chart }
    pub fn chart_mut(&mut self) -> &mut Chart { &mut self.chart }

    /// Bind a tooltip element to this session's chart.
    pub fn bind_tooltip<T: TooltipElement + 'static>(&mut self, tooltip: Rc<RefCell<T>>) -> SubscriptionId {
        let source = Rc::new(self.chart.store());
        CursorTooltipBinder::bind(&mut self.chart, tooltip, source, self.controller.state(), self.options.tooltip())
    }

    pub fn unbind_tooltip(&mut self, id: SubscriptionId) -> bool { self.chart.unsubscribe_crosshair_move(id) }

    /// Start a load, superseding any in flight.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        if let Some(prev) = self.pending.replace(self.generation) {
            debug!(prev, next = self.generation, "superseding pending load");
        }
        LoadTicket(self.generation)
    }

    /// Drop the pending load, if any; its completion will be rejected.
    pub fn cancel_load(&mut self) {
        if let Some(prev) = self.pending.take() {
            debug!(prev, "load cancelled");
        }
    }

    pub fn is_loading(&self) -> bool { self.pending.is_some() }

    /// Finish the load identified by `ticket` with the fetched rows.
    pub fn complete_load(&mut self, ticket: LoadTicket, rows: ChartResult<Vec<RawRow>>) -> ChartResult<LoadReport> {
        if self.pending != Some(ticket.0) {
            return Err(ChartError::Superseded);
        }
        self.pending = None;

        let rows = rows?;
        let normalized = normalize_with(&rows, &NormalizeOptions { resolution: self.options.resolution });
        if normalized.points.is_empty() {
            return Err(ChartError::EmptySeries { rejected: normalized.rejected.len() });
        }

        let report = LoadReport { points: normalized.points.len(), rejected: normalized.rejected };
        self.chart.set_data(normalized.points);
        info!(points = report.points, rejected = report.rejected.len(), "chart loaded");
        Ok(report)
    }

    /// Fetch, parse and normalize the feed at `url` in one step.
    pub fn load<F: FeedSource + ?Sized>(&mut self, source: &F, url: &Url) -> ChartResult<LoadReport> {
        let ticket = self.begin_load();
        let rows = source.fetch(url).and_then(|body| read_rows(&body));
        self.complete_load(ticket, rows)
    }
}
