//! Dashboard configuration — backend origin and selectable symbols/strategies.
//!
//! Stored as a TOML file. A missing or corrupt file falls back to the
//! defaults so the dashboard always starts.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Top-level dashboard configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub backend_url: String,
    pub symbols: Vec<String>,
    pub strategies: Vec<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:5000".into(),
            symbols: vec!["MSFT".into(), "AAPL".into(), "GOOGL".into()],
            strategies: vec!["RSI".into(), "MACD".into()],
        }
    }
}

impl DashboardConfig {
    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("parse config TOML: {e}"))
    }

    /// Load from a TOML file, falling back to defaults if missing or corrupt.
    pub fn load_or_default(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_original_selections() {
        let cfg = DashboardConfig::default();
        assert_eq!(cfg.backend_url, "http://127.0.0.1:5000");
        assert_eq!(cfg.symbols, vec!["MSFT", "AAPL", "GOOGL"]);
        assert_eq!(cfg.strategies, vec!["RSI", "MACD"]);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let cfg = DashboardConfig::from_toml("backend_url = \"http://10.0.0.2:5000\"").unwrap();
        assert_eq!(cfg.backend_url, "http://10.0.0.2:5000");
        assert_eq!(cfg.strategies.len(), 2);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = DashboardConfig::load_or_default(Path::new("/nonexistent/stratview.toml"));
        assert_eq!(cfg.symbols.len(), 3);
    }
}
