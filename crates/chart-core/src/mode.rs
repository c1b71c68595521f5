// File: crates/chart-core/src/mode.rs
// Summary: Active rendering mode and the lockstep visibility of the two renderings.
// Notes:
// - `ModeState` is the single shared cell. The controller writes it; the chart
//   surface and the tooltip binder hold clones and only read.
// - Single-threaded by construction (`Rc` + `Cell`). A multi-threaded host would
//   swap this for one atomic holding both mode and visibility.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartMode {
    #[default]
    Area,
    Candlestick,
}

impl ChartMode {
    pub const ALL: [ChartMode; 2] = [ChartMode::Area, ChartMode::Candlestick];

    pub fn other(self) -> Self {
        match self {
            ChartMode::Area => ChartMode::Candlestick,
            ChartMode::Candlestick => ChartMode::Area,
        }
    }
}

/// Visibility flags of the two renderings.
/// Contract: built only from a mode, so exactly one flag is set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Visibility {
    area: bool,
    candlestick: bool,
}

impl Visibility {
    pub const fn for_mode(mode: ChartMode) -> Self {
        match mode {
            ChartMode::Area => Self { area: true, candlestick: false },
            ChartMode::Candlestick => Self { area: false, candlestick: true },
        }
    }
    pub const fn area(&self) -> bool { self.area }
    pub const fn candlestick(&self) -> bool { self.candlestick }
    pub const fn is_visible(&self, mode: ChartMode) -> bool {
        match mode {
            ChartMode::Area => self.area,
            ChartMode::Candlestick => self.candlestick,
        }
    }
}

type ModeListener = Rc<dyn Fn(ChartMode)>;

struct ModeCell {
    mode: Cell<ChartMode>,
    visibility: Cell<Visibility>,
    listeners: RefCell<Vec<ModeListener>>,
}

/// Shared handle to the active mode. Cloning shares the same cell.
#[derive(Clone)]
pub struct ModeState {
    inner: Rc<ModeCell>,
}

impl ModeState {
    pub fn new(initial: ChartMode) -> Self {
        Self {
            inner: Rc::new(ModeCell {
                mode: Cell::new(initial),
                visibility: Cell::new(Visibility::for_mode(initial)),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn mode(&self) -> ChartMode { self.inner.mode.get() }
    pub fn visibility(&self) -> Visibility { self.inner.visibility.get() }
    pub fn is_visible(&self, mode: ChartMode) -> bool { self.visibility().is_visible(mode) }

    fn write(&self, mode: ChartMode) {
        // Visibility is one cell, so both flags change in a single store.
        self.inner.visibility.set(Visibility::for_mode(mode));
        self.inner.mode.set(mode);
        // Snapshot, so a listener may subscribe; new listeners start with the next write.
        let listeners: Vec<ModeListener> = self.inner.listeners.borrow().clone();
        for listener in listeners {
            listener(mode);
        }
    }
}

impl Default for ModeState {
    fn default() -> Self { Self::new(ChartMode::default()) }
}

impl std::fmt::Debug for ModeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModeState")
            .field("mode", &self.mode())
            .field("visibility", &self.visibility())
            .finish()
    }
}

/// Owns writes to a [`ModeState`].
pub struct ChartModeController {
    state: ModeState,
}

impl ChartModeController {
    /// Controller over a fresh state in the default (area) mode.
    pub fn new() -> Self { Self { state: ModeState::default() } }

    pub fn with_state(state: ModeState) -> Self { Self { state } }

    /// Handle for readers (chart surface, tooltip binder).
    pub fn state(&self) -> ModeState { self.state.clone() }

    pub fn set_mode(&self, mode: ChartMode) {
        debug!(?mode, "set chart mode");
        self.state.write(mode);
    }

    pub fn current_mode(&self) -> ChartMode { self.state.mode() }

    pub fn visibility(&self) -> Visibility { self.state.visibility() }

    pub fn is_visible(&self, mode: ChartMode) -> bool { self.state.is_visible(mode) }

    pub fn show_area(&self) { self.set_mode(ChartMode::Area) }

    pub fn show_candlestick(&self) { self.set_mode(ChartMode::Candlestick) }

    /// Switch to the other rendering; returns the new mode.
    pub fn toggle(&self) -> ChartMode {
        let next = self.current_mode().other();
        self.set_mode(next);
        next
    }

    /// Called after every mode write, with the new mode.
    pub fn subscribe(&self, listener: impl Fn(ChartMode) + 'static) {
        self.state.inner.listeners.borrow_mut().push(Rc::new(listener));
    }
}

impl Default for ChartModeController {
    fn default() -> Self { Self::new() }
}
