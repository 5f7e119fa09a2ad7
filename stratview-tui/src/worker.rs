//! Background worker thread — all HTTP requests run here.
//!
//! Communication with the TUI main thread is via `mpsc` channels. Date
//! resolution happens worker-side just before query construction, and the
//! clamped window is echoed back so the UI can display the effective range.
//! Stale responses are filtered on the main thread by request id.

use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use stratview_api::dates::{self, DateRange};
use stratview_api::diagnostics::Diagnostics;
use stratview_api::{ApiError, BacktestClient, ComparisonEntry, StrategySeries, TradesPage};

/// Commands sent from the TUI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    FetchSeries {
        req_id: u64,
        symbol: String,
        strategy: String,
        start_raw: String,
        end_raw: String,
    },
    FetchTrades {
        req_id: u64,
        symbol: String,
        strategy: String,
        page: u32,
    },
    FetchComparison {
        req_id: u64,
        symbol: String,
        start_raw: String,
        end_raw: String,
    },
    Shutdown,
}

/// Responses sent from the worker back to the TUI.
#[derive(Debug)]
pub enum WorkerResponse {
    /// A degraded default was substituted during date resolution.
    Adjustment { context: String, message: String },
    /// The window actually queried after clamping.
    WindowResolved { req_id: u64, range: DateRange },

    SeriesReady {
        req_id: u64,
        series: Box<StrategySeries>,
    },
    SeriesFailed {
        req_id: u64,
        error: ApiError,
    },

    TradesReady {
        req_id: u64,
        page: TradesPage,
    },
    TradesFailed {
        req_id: u64,
        error: ApiError,
    },

    CompareReady {
        req_id: u64,
        entries: Vec<ComparisonEntry>,
    },
    CompareFailed {
        req_id: u64,
        error: ApiError,
    },
}

/// Diagnostics sink that forwards adjustment events through the response
/// channel. Request start/finish events stay silent; the panels already
/// show loading state.
struct ChannelDiagnostics {
    tx: Sender<WorkerResponse>,
}

impl Diagnostics for ChannelDiagnostics {
    fn adjustment(&self, context: &str, message: &str) {
        let _ = self.tx.send(WorkerResponse::Adjustment {
            context: context.to_string(),
            message: message.to_string(),
        });
    }

    fn request_started(&self, _endpoint: &str) {}
    fn request_finished(&self, _endpoint: &str, _outcome: &Result<(), &ApiError>) {}
}

/// Spawn the background worker thread.
pub fn spawn_worker(
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
    backend_url: String,
) -> JoinHandle<()> {
    thread::Builder::new()
        .name("stratview-worker".into())
        .spawn(move || {
            let diagnostics = Arc::new(ChannelDiagnostics { tx: tx.clone() });
            let client = BacktestClient::new(backend_url, diagnostics.clone());
            worker_loop(rx, tx, client, diagnostics);
        })
        .expect("failed to spawn worker thread")
}

fn worker_loop(
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
    client: BacktestClient,
    diagnostics: Arc<ChannelDiagnostics>,
) {
    loop {
        match rx.recv() {
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
            Ok(cmd) => handle_command(cmd, &tx, &client, diagnostics.as_ref()),
        }
    }
}

fn handle_command(
    cmd: WorkerCommand,
    tx: &Sender<WorkerResponse>,
    client: &BacktestClient,
    diagnostics: &dyn Diagnostics,
) {
    let today = chrono::Local::now().date_naive();

    match cmd {
        WorkerCommand::FetchSeries {
            req_id,
            symbol,
            strategy,
            start_raw,
            end_raw,
        } => {
            let range = dates::resolve(&start_raw, &end_raw, today, diagnostics);
            let _ = tx.send(WorkerResponse::WindowResolved { req_id, range });
            let resp = match client.strategy_data(&symbol, &strategy, &range) {
                Ok(series) => WorkerResponse::SeriesReady {
                    req_id,
                    series: Box::new(series),
                },
                Err(error) => WorkerResponse::SeriesFailed { req_id, error },
            };
            let _ = tx.send(resp);
        }
        WorkerCommand::FetchTrades {
            req_id,
            symbol,
            strategy,
            page,
        } => {
            let resp = match client.trades(&symbol, &strategy, page) {
                Ok(page) => WorkerResponse::TradesReady { req_id, page },
                Err(error) => WorkerResponse::TradesFailed { req_id, error },
            };
            let _ = tx.send(resp);
        }
        WorkerCommand::FetchComparison {
            req_id,
            symbol,
            start_raw,
            end_raw,
        } => {
            let resp = match client.compare_strategies(&symbol, &start_raw, &end_raw, today) {
                Ok(entries) => WorkerResponse::CompareReady { req_id, entries },
                Err(error) => WorkerResponse::CompareFailed { req_id, error },
            };
            let _ = tx.send(resp);
        }
        WorkerCommand::Shutdown => {} // handled in loop
    }
}
