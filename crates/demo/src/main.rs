// File: crates/demo/src/main.rs
// Summary: Demo loads an OHLC CSV into a chart session and replays a hover path in both modes.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use sense_chart_core::theme;
use sense_chart_core::{
    ApiClient, ChartMode, ChartOptions, ChartSession, EdgePolicy, Environment, FileFeed, KlineRequest, MemoryStore,
    TimeWindow, TooltipBox, UserConfig,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const SAMPLE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/btc_daily.csv");

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Accept path from CLI or fall back to the bundled sample (supports .csv/.cvs swap)
    let raw = std::env::args().nth(1).unwrap_or_else(|| SAMPLE.to_string());
    let (path, used_alt) = resolve_path(&raw)?;
    info!(path = %path.display(), used_alt, "using input file");

    let opts = ChartOptions {
        width: 800.0,
        height: 400.0,
        edge_policy: EdgePolicy::Flip { margin: 8.0 },
        theme: theme::find(&std::env::var("SENSE_CHART_THEME").unwrap_or_default()),
        ..ChartOptions::default()
    };
    let mut session = ChartSession::new(opts);
    let url = FileFeed::url_for(&path).with_context(|| format!("resolving '{}'", path.display()))?;
    let report = session
        .load(&FileFeed, &url)
        .with_context(|| format!("failed to load CSV '{}'", path.display()))?;
    for r in &report.rejected {
        warn!(row = r.index, error = %r.error, "row skipped");
    }
    println!("Loaded {} points ({} rows rejected)", report.points, report.rejected.len());

    let tooltip = Rc::new(RefCell::new(TooltipBox::with_size(140.0, 96.0)));
    session.bind_tooltip(tooltip.clone());

    let width = session.chart().client_rect().width;
    let path_xs = hover_path(width, 5);

    for mode in ChartMode::ALL {
        session.controller().set_mode(mode);
        println!("\n== {mode:?} ==");
        for &x in &path_xs {
            session.chart_mut().pointer_move(x, 120.0);
            let tip = tooltip.borrow();
            match (&tip.content, tip.is_visible()) {
                (Some(content), true) => {
                    println!("x={x:>6.1} -> ({:.0}, {:.0})", tip.left, tip.top);
                    for line in content.text().lines() {
                        println!("    {line}");
                    }
                }
                _ => println!("x={x:>6.1} -> hidden"),
            }
        }
    }

    session.chart_mut().pointer_leave();
    println!("\nAfter leave: visible = {}", tooltip.borrow().is_visible());

    print_kline_url()?;
    Ok(())
}

/// Evenly spaced x positions, plus one on each side outside the surface.
fn hover_path(width: f64, steps: usize) -> Vec<f64> {
    let mut xs = vec![-1.0];
    xs.extend((0..steps).map(|i| width * (i as f64 + 0.5) / steps as f64));
    xs.push(width + 1.0);
    xs
}

/// Show the kline URL a remote load of the same range would use.
fn print_kline_url() -> Result<()> {
    let cfg = UserConfig::new(Environment::Client, MemoryStore::default())?;
    let client = ApiClient::from_config(&cfg).context("building api client")?;
    let begin = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().context("begin")?;
    let end = Utc.with_ymd_and_hms(2024, 1, 6, 0, 0, 0).single().context("end")?;
    let req = KlineRequest::new("yfinance", "BTC-USD", TimeWindow::Iso { begin, end });
    println!("Remote equivalent: {}", client.kline_url(&req));
    Ok(())
}

/// Resolve path, trying .csv/.cvs swap if needed.
/// Returns (actual_path, used_alt)
fn resolve_path(raw: &str) -> Result<(PathBuf, bool)> {
    let p = Path::new(raw);
    if p.exists() {
        return Ok((p.to_path_buf(), false));
    }
    if let Some(alt) = swap_ext(p) {
        if alt.exists() {
            return Ok((alt, true));
        }
    }
    anyhow::bail!("file not found: {}", p.display());
}

fn swap_ext(p: &Path) -> Option<PathBuf> {
    let mut alt = p.to_path_buf();
    let ext = p.extension()?.to_string_lossy().to_lowercase();
    match ext.as_str() {
        "cvs" => {
            alt.set_extension("csv");
            Some(alt)
        }
        "csv" => {
            alt.set_extension("cvs");
            Some(alt)
        }
        _ => None,
    }
}
