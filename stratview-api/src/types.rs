//! Response models for the `/api/*` contract.
//!
//! Payloads deserialize into raw structs with optional fields first, then
//! validate into the public types so a missing array yields a descriptive
//! format error naming the field instead of an opaque serde message. The
//! backend has shipped both `created_date`/`created_at` and
//! `return`/`return_value` spellings, so trades accept the aliases.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::ApiError;

/// `GET /api/health` response. Extra fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self.status.as_str(), "ok" | "healthy" | "alive")
    }
}

/// Index-aligned time series for one (symbol, strategy) query.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategySeries {
    pub dates: Vec<NaiveDate>,
    pub prices: Vec<f64>,
    /// -1 sell, 0 hold, 1 buy at each index.
    pub signals: Vec<i8>,
    pub strategy_returns: Vec<f64>,
    /// Optional precomputed RSI values in [0, 100].
    pub rsi: Option<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
struct RawSeries {
    dates: Option<Vec<NaiveDate>>,
    prices: Option<Vec<f64>>,
    signals: Option<Vec<i8>>,
    strategy_returns: Option<Vec<f64>>,
    rsi: Option<Vec<f64>>,
}

impl StrategySeries {
    /// Parse and validate a strategy-data payload.
    ///
    /// All four required arrays must be present and equal-length; anything
    /// less is a format error, not a partial render.
    pub fn from_json(body: &str) -> Result<Self, ApiError> {
        let raw: RawSeries = serde_json::from_str(body)
            .map_err(|e| ApiError::Format(format!("strategy data is not valid JSON: {e}")))?;

        let dates = raw
            .dates
            .ok_or_else(|| ApiError::Format("missing 'dates' array".into()))?;
        let prices = raw
            .prices
            .ok_or_else(|| ApiError::Format("missing 'prices' array".into()))?;
        let signals = raw
            .signals
            .ok_or_else(|| ApiError::Format("missing 'signals' array".into()))?;
        let strategy_returns = raw
            .strategy_returns
            .ok_or_else(|| ApiError::Format("missing 'strategy_returns' array".into()))?;

        let n = dates.len();
        for (name, len) in [
            ("prices", prices.len()),
            ("signals", signals.len()),
            ("strategy_returns", strategy_returns.len()),
        ] {
            if len != n {
                return Err(ApiError::Format(format!(
                    "'{name}' has {len} entries but 'dates' has {n}"
                )));
            }
        }
        if let Some(rsi) = &raw.rsi {
            if rsi.len() != n {
                return Err(ApiError::Format(format!(
                    "'rsi' has {} entries but 'dates' has {n}",
                    rsi.len()
                )));
            }
        }

        Ok(Self {
            dates,
            prices,
            signals,
            strategy_returns,
            rsi: raw.rsi,
        })
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Price at each index where signal = 1, `None` elsewhere.
    pub fn buy_markers(&self) -> Vec<Option<f64>> {
        self.markers(1)
    }

    /// Price at each index where signal = -1, `None` elsewhere.
    pub fn sell_markers(&self) -> Vec<Option<f64>> {
        self.markers(-1)
    }

    fn markers(&self, wanted: i8) -> Vec<Option<f64>> {
        self.signals
            .iter()
            .zip(&self.prices)
            .map(|(&s, &p)| (s == wanted).then_some(p))
            .collect()
    }
}

/// A single trade record, read-only snapshot from the backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Trade {
    #[serde(alias = "created_at")]
    pub created_date: NaiveDate,
    pub symbol: String,
    pub strategy: String,
    /// Sign determines the side: positive = buy, negative = sell.
    #[serde(default)]
    pub signal: i32,
    #[serde(default)]
    pub entry_price: f64,
    pub exit_price: Option<f64>,
    #[serde(alias = "return")]
    pub return_value: f64,
}

/// Aggregate metrics for one (symbol, strategy) query.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetricsSummary {
    pub total_return: f64,
    pub win_rate: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    pub trades: u32,
    pub avg_return_per_trade: f64,
}

/// One page of trades plus optional metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct TradesPage {
    pub trades: Vec<Trade>,
    pub total_pages: u32,
    /// Absent metrics still renders the trade table, just without the panel.
    pub metrics: Option<MetricsSummary>,
}

#[derive(Debug, Deserialize)]
struct RawTradesPage {
    trades: Option<Vec<Trade>>,
    total: Option<u64>,
    per_page: Option<u64>,
    /// Legacy responses precompute the page count.
    pages: Option<u32>,
    metrics: Option<MetricsSummary>,
}

impl TradesPage {
    /// Parse and validate a trades payload. A missing `trades` array is a
    /// format error; missing pagination metadata degrades to a single page.
    pub fn from_json(body: &str) -> Result<Self, ApiError> {
        let raw: RawTradesPage = serde_json::from_str(body)
            .map_err(|e| ApiError::Format(format!("trades response is not valid JSON: {e}")))?;

        let trades = raw
            .trades
            .ok_or_else(|| ApiError::Format("missing 'trades' array".into()))?;

        let total_pages = match (raw.pages, raw.total, raw.per_page) {
            (Some(pages), _, _) => pages.max(1),
            (None, Some(total), Some(per_page)) if per_page > 0 => {
                (total.div_ceil(per_page)).max(1) as u32
            }
            _ => 1,
        };

        Ok(Self {
            trades,
            total_pages,
            metrics: raw.metrics,
        })
    }
}

/// Per-strategy metric summary from `/api/compare_strategies`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ComparisonEntry {
    pub strategy: String,
    pub total_return: f64,
    pub win_rate: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub trades: u32,
}

/// Sort comparison entries by total return, best first. Stable, so ties
/// keep their fetch order.
pub fn rank_by_total_return(entries: &mut [ComparisonEntry]) {
    entries.sort_by(|a, b| {
        b.total_return
            .partial_cmp(&a.total_return)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}
