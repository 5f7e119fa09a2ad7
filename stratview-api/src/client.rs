//! Blocking HTTP client for the backtest backend.
//!
//! One client instance serves all three endpoint families. Every request
//! shares the 30-second budget; the strategy-data path additionally probes
//! `/api/health` first so connectivity failures surface before the heavier
//! data request is issued.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;

use crate::dates::{self, DateRange};
use crate::diagnostics::Diagnostics;
use crate::error::ApiError;
use crate::types::{rank_by_total_return, ComparisonEntry, HealthStatus, StrategySeries, TradesPage};

/// Fixed page size for the trades endpoint.
pub const TRADES_PER_PAGE: u32 = 10;

/// Per-request budget. Requests exceeding it are abandoned, not retried.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client for the backend's `/api/*` REST family.
pub struct BacktestClient {
    http: reqwest::blocking::Client,
    base_url: String,
    diagnostics: Arc<dyn Diagnostics>,
}

/// Query parameters for `/api/strategy_data`.
pub fn series_params(symbol: &str, strategy: &str, range: &DateRange) -> Vec<(&'static str, String)> {
    vec![
        ("symbol", symbol.to_string()),
        ("strategy", strategy.to_string()),
        ("start_date", range.start_param()),
        ("end_date", range.end_param()),
    ]
}

/// Query parameters for `/api/trades`.
pub fn trades_params(symbol: &str, strategy: &str, page: u32) -> Vec<(&'static str, String)> {
    vec![
        ("symbol", symbol.to_string()),
        ("strategy", strategy.to_string()),
        ("page", page.max(1).to_string()),
        ("per_page", TRADES_PER_PAGE.to_string()),
    ]
}

/// Query parameters for `/api/compare_strategies`.
pub fn compare_params(symbol: &str, range: &DateRange) -> Vec<(&'static str, String)> {
    vec![
        ("symbol", symbol.to_string()),
        ("start_date", range.start_param()),
        ("end_date", range.end_param()),
    ]
}

impl BacktestClient {
    pub fn new(base_url: impl Into<String>, diagnostics: Arc<dyn Diagnostics>) -> Self {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            diagnostics,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Liveness probe against `/api/health`.
    pub fn check_health(&self) -> Result<HealthStatus, ApiError> {
        let body = self.get("/api/health", &[])?;
        let health: HealthStatus = serde_json::from_str(&body)
            .map_err(|e| ApiError::Format(format!("health response: {e}")))?;
        if health.is_healthy() {
            Ok(health)
        } else {
            Err(ApiError::Unhealthy(format!(
                "backend reported status {:?}",
                health.status
            )))
        }
    }

    /// Fetch the time series for one (symbol, strategy, range) triple.
    ///
    /// Probes the health endpoint first; a failed probe surfaces as a
    /// connectivity error without issuing the data request.
    pub fn strategy_data(
        &self,
        symbol: &str,
        strategy: &str,
        range: &DateRange,
    ) -> Result<StrategySeries, ApiError> {
        require(symbol, "symbol")?;
        require(strategy, "strategy")?;

        self.check_health()?;

        let body = self.get("/api/strategy_data", &series_params(symbol, strategy, range))?;
        StrategySeries::from_json(&body)
    }

    /// Fetch one page of trades plus the metrics summary.
    pub fn trades(&self, symbol: &str, strategy: &str, page: u32) -> Result<TradesPage, ApiError> {
        require(symbol, "symbol")?;
        require(strategy, "strategy")?;

        let body = self.get("/api/trades", &trades_params(symbol, strategy, page))?;
        TradesPage::from_json(&body)
    }

    /// Fetch per-strategy metric summaries, ranked by total return.
    ///
    /// The range is gate-validated: an invalid range blocks the request with
    /// a validation error rather than being clamped.
    pub fn compare_strategies(
        &self,
        symbol: &str,
        start_raw: &str,
        end_raw: &str,
        today: NaiveDate,
    ) -> Result<Vec<ComparisonEntry>, ApiError> {
        require(symbol, "symbol")?;
        let range = dates::validate_raw(start_raw, end_raw, today)
            .map_err(|e| ApiError::InvalidDateRange(e.to_string()))?;

        let body = self.get("/api/compare_strategies", &compare_params(symbol, &range))?;
        let mut entries: Vec<ComparisonEntry> = serde_json::from_str(&body)
            .map_err(|e| ApiError::Format(format!("comparison response: {e}")))?;
        rank_by_total_return(&mut entries);
        Ok(entries)
    }

    /// Issue a GET and return the body text. Non-success statuses capture the
    /// body for diagnosis; network failures map to typed errors.
    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<String, ApiError> {
        let url = format!("{}{path}", self.base_url);
        self.diagnostics.request_started(path);

        let result = self.execute(&url, query);
        let outcome = result.as_ref().map(|_| ());
        self.diagnostics.request_finished(path, &outcome);
        result
    }

    fn execute(&self, url: &str, query: &[(&str, String)]) -> Result<String, ApiError> {
        let resp = self
            .http
            .get(url)
            .query(query)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .map_err(map_transport_error)?;

        let status = resp.status();
        let body = resp.text().map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

fn require(value: &str, name: &'static str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        Err(ApiError::MissingParameter(name))
    } else {
        Ok(())
    }
}

fn map_transport_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::TimedOut(REQUEST_TIMEOUT_SECS)
    } else {
        ApiError::Unreachable(e.to_string())
    }
}
