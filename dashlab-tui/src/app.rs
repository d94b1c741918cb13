//! Application state, single-owner, main-thread only.
//!
//! All TUI state lives here. The worker thread communicates via channels.

use std::sync::mpsc::{Receiver, Sender};

use chrono::{Duration, NaiveDate};

use dashlab_core::charts::ChartKind;
use dashlab_core::session::{QuotesReport, TipsReport};
use dashlab_core::status::Notice;

use crate::worker::{WorkerCommand, WorkerResponse};

/// Days the quote window moves per `[` / `]` press.
pub const WINDOW_STEP_DAYS: i64 = 30;

/// Which screen is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Quotes,
    Tips,
}

impl Screen {
    pub fn index(self) -> usize {
        match self {
            Screen::Quotes => 0,
            Screen::Tips => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Screen::Quotes => "Quotes",
            Screen::Tips => "Tips",
        }
    }
}

/// Quotes screen state.
#[derive(Debug)]
pub struct QuotesState {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub loading: bool,
    pub report: Option<QuotesReport>,
}

impl QuotesState {
    /// Move the window by `days` (negative = back in time), keeping its length.
    pub fn shift(&mut self, days: i64) {
        self.start += Duration::days(days);
        self.end += Duration::days(days);
    }
}

/// Tips screen state.
#[derive(Debug)]
pub struct TipsState {
    /// Uploaded CSV bytes; `None` uses the remote demo dataset.
    pub upload: Option<Vec<u8>>,
    pub preview_rows: usize,
    /// Index into `ChartKind::ALL` of the chart on display.
    pub chart_index: usize,
    pub loading: bool,
    pub report: Option<TipsReport>,
}

impl TipsState {
    pub fn chart_kind(&self) -> ChartKind {
        ChartKind::ALL[self.chart_index % ChartKind::ALL.len()]
    }

    pub fn next_chart(&mut self) {
        self.chart_index = (self.chart_index + 1) % ChartKind::ALL.len();
    }

    pub fn prev_chart(&mut self) {
        let n = ChartKind::ALL.len();
        self.chart_index = (self.chart_index + n - 1) % n;
    }
}

/// Top-level application state.
pub struct AppState {
    pub screen: Screen,
    pub running: bool,
    pub quotes: QuotesState,
    pub tips: TipsState,
    pub status: Option<Notice>,
    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,
}

impl AppState {
    pub fn new(
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
        quotes: QuotesState,
        tips: TipsState,
    ) -> Self {
        Self {
            screen: Screen::Quotes,
            running: true,
            quotes,
            tips,
            status: None,
            worker_tx,
            worker_rx,
        }
    }

    /// Ask the worker for the current quote window.
    pub fn request_quotes(&mut self) {
        let cmd = WorkerCommand::LoadQuotes {
            ticker: self.quotes.ticker.clone(),
            start: self.quotes.start,
            end: self.quotes.end,
        };
        if self.worker_tx.send(cmd).is_ok() {
            self.quotes.loading = true;
            self.status = Some(Notice::info(format!(
                "Loading {} {} to {}...",
                self.quotes.ticker, self.quotes.start, self.quotes.end
            )));
        } else {
            self.status = Some(Notice::error("Background worker is not running."));
        }
    }

    /// Ask the worker to (re)load the tips dataset.
    pub fn request_tips(&mut self) {
        let cmd = WorkerCommand::LoadTips {
            upload: self.tips.upload.clone(),
        };
        if self.worker_tx.send(cmd).is_ok() {
            self.tips.loading = true;
            self.status = Some(Notice::info("Loading tips dataset..."));
        } else {
            self.status = Some(Notice::error("Background worker is not running."));
        }
    }

    pub fn reload(&mut self) {
        match self.screen {
            Screen::Quotes => self.request_quotes(),
            Screen::Tips => self.request_tips(),
        }
    }

    pub fn shift_window(&mut self, days: i64) {
        self.quotes.shift(days);
        self.request_quotes();
    }

    /// Apply a worker response. The status line shows the most severe notice.
    pub fn apply(&mut self, response: WorkerResponse) {
        match response {
            WorkerResponse::Quotes(report) => {
                self.quotes.loading = false;
                self.status = Some(summary_notice(
                    &report.notices,
                    format!("Loaded {} rows for {}", report.table.len(), report.ticker),
                ));
                self.quotes.report = Some(*report);
            }
            WorkerResponse::Tips(report) => {
                self.tips.loading = false;
                self.status = Some(summary_notice(
                    &report.notices,
                    format!("Loaded {} tips rows", report.table.height()),
                ));
                self.tips.report = Some(*report);
            }
        }
    }
}

fn summary_notice(notices: &[Notice], fallback: String) -> Notice {
    notices
        .iter()
        .max_by_key(|n| n.severity)
        .cloned()
        .unwrap_or_else(|| Notice::success(fallback))
}
