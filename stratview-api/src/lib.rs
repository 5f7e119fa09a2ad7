//! StratView API layer — clients for the backtest backend's `/api/*` REST family.
//!
//! Everything here is display plumbing: the backend owns strategy evaluation,
//! indicator math, and trade storage. This crate resolves date ranges, issues
//! the HTTP requests, validates response shapes, and maps failures to typed
//! errors the dashboard can render.

pub mod client;
pub mod config;
pub mod dates;
pub mod diagnostics;
pub mod error;
pub mod types;

pub use client::{BacktestClient, TRADES_PER_PAGE};
pub use config::DashboardConfig;
pub use dates::{DateRange, DateRangeError};
pub use diagnostics::{Diagnostics, NullDiagnostics, StdoutDiagnostics};
pub use error::ApiError;
pub use types::{
    ComparisonEntry, HealthStatus, MetricsSummary, StrategySeries, Trade, TradesPage,
};
