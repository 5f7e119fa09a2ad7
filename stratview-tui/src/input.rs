//! Keyboard input dispatch — overlays first, then global keys, then
//! panel-specific handlers. Any selection change supersedes in-flight
//! requests and restarts the affected fetches at loading.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, DateField, Overlay, Panel};

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays consume input first.
    match app.overlay.clone() {
        Overlay::DateEntry { field, buffer } => {
            handle_date_entry(app, key, field, buffer);
            return;
        }
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Global keys.
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('1') => { activate(app, Panel::Chart); return; }
        KeyCode::Char('2') => { activate(app, Panel::Trades); return; }
        KeyCode::Char('3') => { activate(app, Panel::Compare); return; }
        KeyCode::Char('4') => { activate(app, Panel::Help); return; }
        KeyCode::Tab => {
            let next = if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.active_panel.prev()
            } else {
                app.active_panel.next()
            };
            activate(app, next);
            return;
        }
        KeyCode::BackTab => {
            let prev = app.active_panel.prev();
            activate(app, prev);
            return;
        }
        KeyCode::Char('e') => {
            app.overlay = Overlay::ErrorHistory;
            app.error_scroll = 0;
            return;
        }
        KeyCode::Char('s') => {
            app.selection.cycle_symbol();
            app.selection_changed();
            return;
        }
        KeyCode::Char('x') => {
            app.selection.cycle_strategy();
            app.selection_changed();
            return;
        }
        KeyCode::Char('a') => {
            app.overlay = Overlay::DateEntry {
                field: DateField::Start,
                buffer: app.selection.start_input.clone(),
            };
            return;
        }
        KeyCode::Char('z') => {
            app.overlay = Overlay::DateEntry {
                field: DateField::End,
                buffer: app.selection.end_input.clone(),
            };
            return;
        }
        KeyCode::Char('r') => {
            refresh_active(app);
            return;
        }
        _ => {}
    }

    // 3. Panel-specific keys.
    if app.active_panel == Panel::Trades {
        handle_trades_key(app, key);
    }
}

/// Switch panels. Entering Compare always starts a fresh fetch; comparison
/// results are never reused across activations.
fn activate(app: &mut AppState, panel: Panel) {
    let entering = app.active_panel != panel;
    app.active_panel = panel;
    if panel == Panel::Compare && entering {
        app.request_compare();
    }
}

fn refresh_active(app: &mut AppState) {
    match app.active_panel {
        Panel::Chart => app.request_series(),
        Panel::Trades => app.request_trades(),
        Panel::Compare => app.request_compare(),
        Panel::Help => {}
    }
}

fn handle_trades_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        // Boundary presses are no-ops; the footer renders them disabled.
        KeyCode::Char('h') | KeyCode::Left => {
            if app.trades.prev_page() {
                app.request_trades();
            }
        }
        KeyCode::Char('l') | KeyCode::Right => {
            if app.trades.next_page() {
                app.request_trades();
            }
        }
        _ => {}
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_date_entry(app: &mut AppState, key: KeyEvent, field: DateField, mut buffer: String) {
    match key.code {
        KeyCode::Esc => {
            app.overlay = Overlay::None;
        }
        KeyCode::Enter => {
            match field {
                DateField::Start => app.selection.start_input = buffer.trim().to_string(),
                DateField::End => app.selection.end_input = buffer.trim().to_string(),
            }
            app.overlay = Overlay::None;
            app.selection_changed();
        }
        KeyCode::Backspace => {
            buffer.pop();
            app.overlay = Overlay::DateEntry { field, buffer };
        }
        KeyCode::Char(c) => {
            buffer.push(c);
            app.overlay = Overlay::DateEntry { field, buffer };
        }
        _ => {}
    }
}
