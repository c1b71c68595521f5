// File: crates/chart-core/src/feed.rs
// Summary: Tabular feed acquisition: a transport seam plus CSV row reading.

use std::path::Path;

use url::Url;

use crate::error::{ChartError, ChartResult};
use crate::normalize::RawRow;

/// Fetches a resource body by URL. Transport lives outside this crate.
pub trait FeedSource {
    fn fetch(&self, url: &Url) -> ChartResult<String>;
}

impl<F: FeedSource + ?Sized> FeedSource for &F {
    fn fetch(&self, url: &Url) -> ChartResult<String> { (**self).fetch(url) }
}

/// Serves `file://` URLs from the local filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileFeed;

impl FileFeed {
    pub fn url_for(path: impl AsRef<Path>) -> ChartResult<Url> {
        let abs = std::fs::canonicalize(path.as_ref())?;
        Url::from_file_path(&abs).map_err(|_| ChartError::Fetch(format!("not a file path: {}", abs.display())))
    }
}

impl FeedSource for FileFeed {
    fn fetch(&self, url: &Url) -> ChartResult<String> {
        if url.scheme() != "file" {
            return Err(ChartError::Fetch(format!("unsupported scheme {:?} for {url}", url.scheme())));
        }
        let path = url.to_file_path().map_err(|_| ChartError::Fetch(format!("bad file url {url}")))?;
        Ok(std::fs::read_to_string(path)?)
    }
}

/// Parse CSV text with a header row into raw rows.
/// Columns are matched by lower-cased header name; extra columns are ignored.
pub fn read_rows(text: &str) -> ChartResult<Vec<RawRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: csv::StringRecord = rdr.headers()?.iter().map(|h| h.to_lowercase()).collect();
    rdr.set_headers(headers);

    let mut rows = Vec::new();
    for rec in rdr.deserialize() {
        rows.push(rec?);
    }
    Ok(rows)
}
