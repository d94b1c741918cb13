//! Background worker thread; every network load runs here.
//!
//! Communication with the TUI main thread is via `mpsc` channels. The worker
//! owns the `Session`, so the quote cache lives as long as the worker does.

use std::io;
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use chrono::NaiveDate;
use tracing::debug;

use dashlab_core::session::{QuotesReport, Session, TipsReport};

/// Commands sent from the TUI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    LoadQuotes {
        ticker: String,
        start: NaiveDate,
        end: NaiveDate,
    },
    LoadTips {
        upload: Option<Vec<u8>>,
    },
    Shutdown,
}

/// Responses sent from the worker back to the TUI.
#[derive(Debug)]
pub enum WorkerResponse {
    Quotes(Box<QuotesReport>),
    Tips(Box<TipsReport>),
}

/// Spawn the background worker thread.
pub fn spawn_worker(
    session: Session,
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("dashlab-worker".into())
        .spawn(move || worker_loop(&session, rx, tx))
}

fn worker_loop(session: &Session, rx: Receiver<WorkerCommand>, tx: Sender<WorkerResponse>) {
    loop {
        match rx.recv() {
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
            Ok(cmd) => {
                let response = handle_command(session, cmd);
                if let Some(response) = response {
                    if tx.send(response).is_err() {
                        break;
                    }
                }
            }
        }
    }
    debug!("worker stopped");
}

fn handle_command(session: &Session, cmd: WorkerCommand) -> Option<WorkerResponse> {
    match cmd {
        WorkerCommand::LoadQuotes { ticker, start, end } => {
            let report = session.quotes(&ticker, start, end);
            Some(WorkerResponse::Quotes(Box::new(report)))
        }
        WorkerCommand::LoadTips { upload } => {
            let report = session.tips(upload.as_deref());
            Some(WorkerResponse::Tips(Box::new(report)))
        }
        WorkerCommand::Shutdown => None, // handled in loop
    }
}
