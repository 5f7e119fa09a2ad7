//! App state persistence — JSON save/load across restarts.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::app::{AppState, Panel};

/// Serializable subset of app state that persists across restarts.
/// Selections are stored by name so a changed config list degrades
/// gracefully to the first entry.
#[derive(Debug, Serialize, Deserialize)]
pub struct PersistedState {
    pub symbol: String,
    pub strategy: String,
    pub start_input: String,
    pub end_input: String,
    pub active_panel: Panel,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            symbol: String::new(),
            strategy: String::new(),
            start_input: String::new(),
            end_input: String::new(),
            active_panel: Panel::Chart,
        }
    }
}

/// Load persisted state from disk. Returns defaults if file is missing or corrupt.
pub fn load(path: &Path) -> PersistedState {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => PersistedState::default(),
    }
}

/// Save persisted state to disk. Creates parent directories if needed.
pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Extract persisted state from AppState.
pub fn extract(app: &AppState) -> PersistedState {
    PersistedState {
        symbol: app.selection.symbol().to_string(),
        strategy: app.selection.strategy().to_string(),
        start_input: app.selection.start_input.clone(),
        end_input: app.selection.end_input.clone(),
        active_panel: app.active_panel,
    }
}

/// Apply persisted state to AppState.
pub fn apply(app: &mut AppState, state: PersistedState) {
    if let Some(idx) = app.selection.symbols.iter().position(|s| *s == state.symbol) {
        app.selection.symbol_idx = idx;
    }
    if let Some(idx) = app
        .selection
        .strategies
        .iter()
        .position(|s| *s == state.strategy)
    {
        app.selection.strategy_idx = idx;
    }
    app.selection.start_input = state.start_input;
    app.selection.end_input = state.end_input;
    app.active_panel = state.active_panel;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let dir = std::env::temp_dir().join("stratview_persist_test");
        let path = dir.join("state.json");

        let state = PersistedState {
            symbol: "AAPL".into(),
            strategy: "MACD".into(),
            start_input: "2024-01-01".into(),
            end_input: "2024-02-01".into(),
            active_panel: Panel::Trades,
        };

        save(&path, &state).unwrap();
        let loaded = load(&path);

        assert_eq!(loaded.symbol, "AAPL");
        assert_eq!(loaded.strategy, "MACD");
        assert_eq!(loaded.active_panel, Panel::Trades);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_returns_defaults() {
        let loaded = load(Path::new("/nonexistent/path/state.json"));
        assert!(loaded.symbol.is_empty());
        assert_eq!(loaded.active_panel, Panel::Chart);
    }

    #[test]
    fn corrupt_file_returns_defaults() {
        let dir = std::env::temp_dir().join("stratview_persist_corrupt");
        let path = dir.join("state.json");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(&path, "not valid json {{{").unwrap();

        let loaded = load(&path);
        assert!(loaded.symbol.is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn unknown_symbol_keeps_first_entry() {
        use crate::app::SelectionState;
        use std::sync::mpsc;

        let (tx, _rx) = mpsc::channel();
        let (_tx2, rx2) = mpsc::channel();
        let mut app = AppState::new(
            SelectionState::new(vec!["MSFT".into()], vec!["RSI".into()]),
            tx,
            rx2,
            std::path::PathBuf::from("."),
        );
        apply(
            &mut app,
            PersistedState {
                symbol: "TSLA".into(),
                ..PersistedState::default()
            },
        );
        assert_eq!(app.selection.symbol(), "MSFT");
    }
}
