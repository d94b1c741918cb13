//! Chooses between an uploaded CSV and the remote demo dataset.
//!
//! Policy:
//! 1. Upload present → parse it. Success is `Local`; failure is `Failed`
//!    with an empty table. The remote dataset is never consulted.
//! 2. No upload → fetch and parse the remote CSV. Success is `Remote`;
//!    transport or parse failure is `Failed` with an empty table.

use super::parse::parse_csv;
use super::source::CsvSource;
use super::{TipsError, TipsTable};
use crate::status::Notice;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Where a loaded tips table came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Parsed from the user's upload.
    Local,
    /// Fetched from the remote demo dataset.
    Remote,
    /// Nothing could be loaded; the table is empty.
    Failed,
}

/// Outcome of a tips load.
#[derive(Debug, Clone)]
pub struct TipsLoad {
    pub table: TipsTable,
    pub provenance: Provenance,
    /// Human-readable failure description when `provenance` is `Failed`.
    pub error: Option<String>,
    /// Whether the failure came from an upload (as opposed to the remote).
    from_upload: bool,
}

impl TipsLoad {
    fn loaded(table: TipsTable, provenance: Provenance) -> Self {
        Self {
            table,
            provenance,
            error: None,
            from_upload: provenance == Provenance::Local,
        }
    }

    fn failed(err: &TipsError, from_upload: bool) -> Self {
        Self {
            table: TipsTable::empty(),
            provenance: Provenance::Failed,
            error: Some(err.to_string()),
            from_upload,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.provenance != Provenance::Failed
    }

    /// The status line a dashboard shows for this load.
    pub fn notice(&self) -> Notice {
        let detail = self.error.as_deref().unwrap_or("unknown error");
        match self.provenance {
            Provenance::Local => Notice::success("Loaded data from the uploaded file."),
            Provenance::Remote => Notice::info("Loaded the demo tips.csv dataset from GitHub."),
            Provenance::Failed if self.from_upload => {
                Notice::error(format!("Failed to read the uploaded file: {detail}"))
            }
            Provenance::Failed => {
                Notice::error(format!("Could not load the default demo dataset: {detail}"))
            }
        }
    }
}

/// Loads tips tables from an upload or a remote fallback.
pub struct TipsLoader {
    remote: Box<dyn CsvSource>,
}

impl TipsLoader {
    pub fn new(remote: Box<dyn CsvSource>) -> Self {
        Self { remote }
    }

    pub fn remote_location(&self) -> &str {
        self.remote.location()
    }

    pub fn load(&self, uploaded: Option<&[u8]>) -> TipsLoad {
        match uploaded {
            Some(bytes) => match parse_csv(bytes) {
                Ok(table) => {
                    info!(rows = table.height(), "loaded uploaded tips CSV");
                    TipsLoad::loaded(table, Provenance::Local)
                }
                Err(e) => {
                    warn!(error = %e, "uploaded tips CSV could not be parsed");
                    TipsLoad::failed(&e, true)
                }
            },
            None => match self.fetch_remote() {
                Ok(table) => {
                    info!(
                        rows = table.height(),
                        url = self.remote.location(),
                        "loaded remote tips CSV"
                    );
                    TipsLoad::loaded(table, Provenance::Remote)
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        transport = e.is_transport(),
                        url = self.remote.location(),
                        "remote tips CSV unavailable"
                    );
                    TipsLoad::failed(&e, false)
                }
            },
        }
    }

    fn fetch_remote(&self) -> Result<TipsTable, TipsError> {
        let bytes = self.remote.fetch()?;
        parse_csv(&bytes)
    }
}
