//! Application state — single-owner, main-thread only.
//!
//! All dashboard state lives here. The worker thread communicates via
//! channels; every response carries the request id it answers, and only the
//! response matching a panel's current in-flight id is allowed to commit.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use stratview_api::dates::DateRange;
use stratview_api::{ApiError, ComparisonEntry, StrategySeries, TradesPage};

use crate::worker::{WorkerCommand, WorkerResponse};

/// Which panel is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Panel {
    Chart,
    Trades,
    Compare,
    Help,
}

impl Panel {
    pub fn index(self) -> usize {
        match self {
            Panel::Chart => 0,
            Panel::Trades => 1,
            Panel::Compare => 2,
            Panel::Help => 3,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Panel::Chart),
            1 => Some(Panel::Trades),
            2 => Some(Panel::Compare),
            3 => Some(Panel::Help),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Panel::Chart => "Chart",
            Panel::Trades => "Trades",
            Panel::Compare => "Compare",
            Panel::Help => "Help",
        }
    }

    pub fn next(self) -> Panel {
        Panel::from_index((self.index() + 1) % 4).unwrap()
    }

    pub fn prev(self) -> Panel {
        Panel::from_index((self.index() + 3) % 4).unwrap()
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// An error record for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

/// Error category for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Connectivity,
    Http,
    Format,
    Other,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Validation => "VAL",
            ErrorCategory::Connectivity => "NET",
            ErrorCategory::Http => "HTTP",
            ErrorCategory::Format => "FMT",
            ErrorCategory::Other => "ERR",
        }
    }

    pub fn from_error(err: &ApiError) -> Self {
        match err {
            ApiError::MissingParameter(_) | ApiError::InvalidDateRange(_) => {
                ErrorCategory::Validation
            }
            ApiError::Unreachable(_) | ApiError::Unhealthy(_) => ErrorCategory::Connectivity,
            ApiError::Status { .. } => ErrorCategory::Http,
            ApiError::Format(_) => ErrorCategory::Format,
            ApiError::TimedOut(_) => ErrorCategory::Other,
        }
    }
}

/// Lifecycle of one data panel's fetch. Each panel owns its state exclusively.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Idle,
    Loading { req_id: u64 },
    Ready(T),
    Failed(String),
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading { .. })
    }

    /// True when `req_id` is the request this panel is currently waiting for.
    pub fn accepts(&self, req_id: u64) -> bool {
        matches!(self, FetchState::Loading { req_id: current } if *current == req_id)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            FetchState::Ready(data) => Some(data),
            _ => None,
        }
    }
}

/// Symbol/strategy/date selections shared by every data panel.
#[derive(Debug, Clone)]
pub struct SelectionState {
    pub symbols: Vec<String>,
    pub strategies: Vec<String>,
    pub symbol_idx: usize,
    pub strategy_idx: usize,
    /// Raw user input, resolved/validated only at request time.
    pub start_input: String,
    pub end_input: String,
}

impl SelectionState {
    pub fn new(symbols: Vec<String>, strategies: Vec<String>) -> Self {
        Self {
            symbols,
            strategies,
            symbol_idx: 0,
            strategy_idx: 0,
            start_input: String::new(),
            end_input: String::new(),
        }
    }

    pub fn symbol(&self) -> &str {
        self.symbols
            .get(self.symbol_idx)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn strategy(&self) -> &str {
        self.strategies
            .get(self.strategy_idx)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn cycle_symbol(&mut self) {
        if !self.symbols.is_empty() {
            self.symbol_idx = (self.symbol_idx + 1) % self.symbols.len();
        }
    }

    pub fn cycle_strategy(&mut self) {
        if !self.strategies.is_empty() {
            self.strategy_idx = (self.strategy_idx + 1) % self.strategies.len();
        }
    }
}

/// Chart panel state.
#[derive(Debug)]
pub struct ChartPanelState {
    pub series: FetchState<StrategySeries>,
    /// The clamped window the worker actually queried, echoed back for display.
    pub resolved: Option<DateRange>,
}

impl ChartPanelState {
    pub fn new() -> Self {
        Self {
            series: FetchState::Idle,
            resolved: None,
        }
    }
}

/// Trades panel state with pagination.
#[derive(Debug)]
pub struct TradesPanelState {
    pub data: FetchState<TradesPage>,
    pub page: u32,
    pub total_pages: u32,
}

impl TradesPanelState {
    pub fn new() -> Self {
        Self {
            data: FetchState::Idle,
            page: 1,
            total_pages: 1,
        }
    }

    pub fn can_prev(&self) -> bool {
        self.page > 1
    }

    pub fn can_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Move one page back. Returns whether the page actually changed.
    pub fn prev_page(&mut self) -> bool {
        if self.can_prev() {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Move one page forward, clamped to the last page.
    pub fn next_page(&mut self) -> bool {
        if self.can_next() {
            self.page += 1;
            true
        } else {
            false
        }
    }

    /// Re-clamp after the backend reports a new page count.
    pub fn set_total_pages(&mut self, total_pages: u32) {
        self.total_pages = total_pages.max(1);
        self.page = self.page.clamp(1, self.total_pages);
    }
}

/// Comparison panel state.
#[derive(Debug)]
pub struct ComparePanelState {
    pub entries: FetchState<Vec<ComparisonEntry>>,
}

impl ComparePanelState {
    pub fn new() -> Self {
        Self {
            entries: FetchState::Idle,
        }
    }
}

/// Which date field a date-entry overlay edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Start,
    End,
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    None,
    DateEntry { field: DateField, buffer: String },
    ErrorHistory,
}

/// Top-level application state.
pub struct AppState {
    // Navigation
    pub active_panel: Panel,
    pub running: bool,

    // Selections and panel states
    pub selection: SelectionState,
    pub chart: ChartPanelState,
    pub trades: TradesPanelState,
    pub compare: ComparePanelState,

    // Worker communication
    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,
    next_req_id: u64,

    // Cross-cutting
    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
    pub overlay: Overlay,

    // Paths
    pub state_path: PathBuf,
}

impl AppState {
    pub fn new(
        selection: SelectionState,
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
        state_path: PathBuf,
    ) -> Self {
        Self {
            active_panel: Panel::Chart,
            running: true,
            selection,
            chart: ChartPanelState::new(),
            trades: TradesPanelState::new(),
            compare: ComparePanelState::new(),
            worker_tx,
            worker_rx,
            next_req_id: 0,
            status_message: None,
            error_history: VecDeque::with_capacity(50),
            error_scroll: 0,
            overlay: Overlay::None,
            state_path,
        }
    }

    fn next_req_id(&mut self) -> u64 {
        self.next_req_id += 1;
        self.next_req_id
    }

    /// Start (or restart) the chart fetch, superseding any in-flight request.
    pub fn request_series(&mut self) {
        let req_id = self.next_req_id();
        self.chart.series = FetchState::Loading { req_id };
        self.chart.resolved = None;
        let _ = self.worker_tx.send(WorkerCommand::FetchSeries {
            req_id,
            symbol: self.selection.symbol().to_string(),
            strategy: self.selection.strategy().to_string(),
            start_raw: self.selection.start_input.clone(),
            end_raw: self.selection.end_input.clone(),
        });
    }

    /// Start (or restart) the trades fetch for the current page.
    pub fn request_trades(&mut self) {
        let req_id = self.next_req_id();
        self.trades.data = FetchState::Loading { req_id };
        let _ = self.worker_tx.send(WorkerCommand::FetchTrades {
            req_id,
            symbol: self.selection.symbol().to_string(),
            strategy: self.selection.strategy().to_string(),
            page: self.trades.page,
        });
    }

    /// Start (or restart) the comparison fetch. The worker gate-validates the
    /// raw dates; an invalid range comes back as a validation failure.
    pub fn request_compare(&mut self) {
        let req_id = self.next_req_id();
        self.compare.entries = FetchState::Loading { req_id };
        let _ = self.worker_tx.send(WorkerCommand::FetchComparison {
            req_id,
            symbol: self.selection.symbol().to_string(),
            start_raw: self.selection.start_input.clone(),
            end_raw: self.selection.end_input.clone(),
        });
    }

    /// Refetch everything affected by a symbol/strategy/date change.
    /// Pagination restarts at page 1 since the result set changed. Comparison
    /// results for the old selection are dropped, never shown again: a hidden
    /// Compare panel goes back to idle and refetches on its next activation.
    pub fn selection_changed(&mut self) {
        self.trades.page = 1;
        self.request_series();
        self.request_trades();
        if self.active_panel == Panel::Compare {
            self.request_compare();
        } else {
            self.compare.entries = FetchState::Idle;
        }
    }

    /// Apply a worker response. Responses for superseded requests are
    /// discarded without touching panel state; timeouts fall back to idle
    /// with a status warning rather than an inline error.
    pub fn apply_response(&mut self, resp: WorkerResponse) {
        match resp {
            WorkerResponse::Adjustment { context, message } => {
                self.set_warning(format!("{context}: {message}"));
            }
            WorkerResponse::WindowResolved { req_id, range } => {
                if self.chart.series.accepts(req_id) {
                    self.chart.resolved = Some(range);
                }
            }
            WorkerResponse::SeriesReady { req_id, series } => {
                if self.chart.series.accepts(req_id) {
                    self.set_status(format!(
                        "Loaded {} points for {} / {}",
                        series.len(),
                        self.selection.symbol(),
                        self.selection.strategy()
                    ));
                    self.chart.series = FetchState::Ready(*series);
                }
            }
            WorkerResponse::SeriesFailed { req_id, error } => {
                if self.chart.series.accepts(req_id) {
                    self.chart.series = self.fail_state(error, "chart");
                }
            }
            WorkerResponse::TradesReady { req_id, page } => {
                if self.trades.data.accepts(req_id) {
                    self.trades.set_total_pages(page.total_pages);
                    self.trades.data = FetchState::Ready(page);
                }
            }
            WorkerResponse::TradesFailed { req_id, error } => {
                if self.trades.data.accepts(req_id) {
                    self.trades.data = self.fail_state(error, "trades");
                }
            }
            WorkerResponse::CompareReady { req_id, entries } => {
                if self.compare.entries.accepts(req_id) {
                    self.compare.entries = FetchState::Ready(entries);
                }
            }
            WorkerResponse::CompareFailed { req_id, error } => {
                if self.compare.entries.accepts(req_id) {
                    self.compare.entries = self.fail_state(error, "comparison");
                }
            }
        }
    }

    /// Map a request failure to the panel state it should leave behind.
    /// Timeouts are discarded (idle + warning), everything else becomes an
    /// inline error and lands in the history.
    fn fail_state<T>(&mut self, error: ApiError, context: &str) -> FetchState<T> {
        if error.is_timeout() {
            self.set_warning(format!("{context}: request timed out, discarded"));
            FetchState::Idle
        } else {
            let message = error.to_string();
            self.push_error(
                ErrorCategory::from_error(&error),
                message.clone(),
                format!(
                    "{context}: symbol={} strategy={} dates={}..{}",
                    self.selection.symbol(),
                    self.selection.strategy(),
                    self.selection.start_input,
                    self.selection.end_input
                ),
            );
            FetchState::Failed(message)
        }
    }

    /// Push an error to the history, capping at 50.
    pub fn push_error(&mut self, category: ErrorCategory, message: String, context: String) {
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message: message.clone(),
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > 50 {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    /// Set an info status message.
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    /// Set a warning status message.
    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn test_app() -> AppState {
        let (tx, _rx) = mpsc::channel();
        let (_tx2, rx2) = mpsc::channel();
        AppState::new(
            SelectionState::new(
                vec!["MSFT".into(), "AAPL".into()],
                vec!["RSI".into(), "MACD".into()],
            ),
            tx,
            rx2,
            PathBuf::from("."),
        )
    }

    fn sample_series() -> StrategySeries {
        StrategySeries::from_json(
            r#"{
                "dates": ["2023-01-01", "2023-01-02"],
                "prices": [100.0, 101.0],
                "signals": [1, -1],
                "strategy_returns": [0.0, 0.01]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn panel_cycle() {
        assert_eq!(Panel::Chart.next(), Panel::Trades);
        assert_eq!(Panel::Help.next(), Panel::Chart);
        assert_eq!(Panel::Chart.prev(), Panel::Help);
        for i in 0..4 {
            assert_eq!(Panel::from_index(i).unwrap().index(), i);
        }
        assert!(Panel::from_index(4).is_none());
    }

    #[test]
    fn selection_cycles_wrap() {
        let mut sel = SelectionState::new(vec!["A".into(), "B".into()], vec!["X".into()]);
        assert_eq!(sel.symbol(), "A");
        sel.cycle_symbol();
        assert_eq!(sel.symbol(), "B");
        sel.cycle_symbol();
        assert_eq!(sel.symbol(), "A");
        sel.cycle_strategy();
        assert_eq!(sel.strategy(), "X");
    }

    #[test]
    fn pagination_clamps_at_boundaries() {
        let mut t = TradesPanelState::new();
        t.set_total_pages(3);
        assert!(!t.can_prev());
        assert!(!t.prev_page());
        assert_eq!(t.page, 1);
        assert!(t.next_page());
        assert!(t.next_page());
        assert_eq!(t.page, 3);
        assert!(!t.can_next());
        assert!(!t.next_page());
        assert_eq!(t.page, 3);
    }

    #[test]
    fn shrinking_page_count_clamps_current_page() {
        let mut t = TradesPanelState::new();
        t.set_total_pages(5);
        t.page = 5;
        t.set_total_pages(3);
        assert_eq!(t.page, 3);
        assert!(!t.can_next());
    }

    #[test]
    fn stale_series_response_is_discarded() {
        let mut app = test_app();
        app.request_series();
        let first = match app.chart.series {
            FetchState::Loading { req_id } => req_id,
            _ => panic!("expected loading"),
        };
        // A newer request supersedes the first.
        app.request_series();
        app.apply_response(WorkerResponse::SeriesReady {
            req_id: first,
            series: Box::new(sample_series()),
        });
        assert!(app.chart.series.is_loading(), "stale response must not commit");
    }

    #[test]
    fn current_series_response_commits() {
        let mut app = test_app();
        app.request_series();
        let current = match app.chart.series {
            FetchState::Loading { req_id } => req_id,
            _ => panic!("expected loading"),
        };
        app.apply_response(WorkerResponse::SeriesReady {
            req_id: current,
            series: Box::new(sample_series()),
        });
        assert!(app.chart.series.data().is_some());
    }

    #[test]
    fn timeout_discards_to_idle_without_error_panel() {
        let mut app = test_app();
        app.request_series();
        let current = match app.chart.series {
            FetchState::Loading { req_id } => req_id,
            _ => panic!("expected loading"),
        };
        app.apply_response(WorkerResponse::SeriesFailed {
            req_id: current,
            error: ApiError::TimedOut(30),
        });
        assert_eq!(app.chart.series, FetchState::Idle);
        assert!(app.error_history.is_empty());
        assert!(matches!(
            app.status_message,
            Some((_, StatusLevel::Warning))
        ));
    }

    #[test]
    fn failure_records_error_with_parameters_echoed() {
        let mut app = test_app();
        app.request_trades();
        let current = match app.trades.data {
            FetchState::Loading { req_id } => req_id,
            _ => panic!("expected loading"),
        };
        app.apply_response(WorkerResponse::TradesFailed {
            req_id: current,
            error: ApiError::Status {
                status: 500,
                body: "boom".into(),
            },
        });
        assert!(matches!(app.trades.data, FetchState::Failed(_)));
        let record = &app.error_history[0];
        assert_eq!(record.category, ErrorCategory::Http);
        assert!(record.context.contains("symbol=MSFT"));
    }

    #[test]
    fn error_in_one_panel_leaves_others_alone() {
        let mut app = test_app();
        app.request_series();
        app.request_compare();
        let compare_id = match app.compare.entries {
            FetchState::Loading { req_id } => req_id,
            _ => panic!("expected loading"),
        };
        app.apply_response(WorkerResponse::CompareFailed {
            req_id: compare_id,
            error: ApiError::InvalidDateRange("future".into()),
        });
        assert!(matches!(app.compare.entries, FetchState::Failed(_)));
        assert!(app.chart.series.is_loading());
    }

    #[test]
    fn selection_change_resets_pagination_and_restarts_fetches() {
        let mut app = test_app();
        app.trades.set_total_pages(4);
        app.trades.page = 3;
        app.selection_changed();
        assert_eq!(app.trades.page, 1);
        assert!(app.chart.series.is_loading());
        assert!(app.trades.data.is_loading());
    }

    #[test]
    fn selection_change_drops_hidden_comparison_results() {
        let mut app = test_app();
        app.request_compare();
        let req_id = match app.compare.entries {
            FetchState::Loading { req_id } => req_id,
            _ => panic!("expected loading"),
        };
        app.apply_response(WorkerResponse::CompareReady {
            req_id,
            entries: vec![ComparisonEntry {
                strategy: "RSI".into(),
                total_return: 0.1,
                win_rate: 0.6,
                sharpe_ratio: 1.2,
                max_drawdown: -0.05,
                trades: 8,
            }],
        });
        assert!(app.compare.entries.data().is_some());

        // Compare is not the active panel, so its results are dropped
        // rather than refetched.
        app.active_panel = Panel::Chart;
        app.selection_changed();
        assert_eq!(app.compare.entries, FetchState::Idle);
    }

    #[test]
    fn selection_change_refetches_comparison_when_active() {
        let mut app = test_app();
        app.active_panel = Panel::Compare;
        app.selection_changed();
        assert!(app.compare.entries.is_loading());
    }

    #[test]
    fn error_history_caps_at_50() {
        let mut app = test_app();
        for i in 0..60 {
            app.push_error(ErrorCategory::Other, format!("error {i}"), String::new());
        }
        assert_eq!(app.error_history.len(), 50);
        assert!(app.error_history[0].message.contains("59"));
    }
}
