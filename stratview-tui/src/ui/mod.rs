//! Top-level UI layout — selection header, active panel, status bar.

pub mod chart_panel;
pub mod compare_panel;
pub mod help_panel;
pub mod overlays;
pub mod status_bar;
pub mod trades_panel;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::{AppState, Overlay, Panel};
use crate::theme;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_selection_header(f, chunks[0], app);
    draw_panel(f, chunks[1], app);
    status_bar::render(f, chunks[2], app);

    match &app.overlay {
        Overlay::DateEntry { field, buffer } => {
            overlays::render_date_entry(f, chunks[1], *field, buffer)
        }
        Overlay::ErrorHistory => overlays::render_error_history(f, chunks[1], app),
        Overlay::None => {}
    }
}

/// One-line header echoing the current selections.
fn draw_selection_header(f: &mut Frame, area: Rect, app: &AppState) {
    let sel = &app.selection;
    let window = match &app.chart.resolved {
        Some(range) => format!("{} .. {}", range.start_param(), range.end_param()),
        None if sel.start_input.is_empty() && sel.end_input.is_empty() => {
            "last 30 days".to_string()
        }
        None => format!("{} .. {}", sel.start_input, sel.end_input),
    };

    let line = Line::from(vec![
        Span::styled(" Symbol ", theme::muted()),
        Span::styled(sel.symbol(), theme::accent_bold()),
        Span::styled("  Strategy ", theme::muted()),
        Span::styled(sel.strategy(), theme::accent_bold()),
        Span::styled("  Window ", theme::muted()),
        Span::styled(window, theme::neutral()),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

/// Draw the active panel with its border.
fn draw_panel(f: &mut Frame, area: Rect, app: &AppState) {
    let panel = app.active_panel;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(format!(" {} [{}] ", panel.label(), panel.index() + 1))
        .title_style(theme::panel_title(true));

    let inner = block.inner(area);
    f.render_widget(block, area);

    match panel {
        Panel::Chart => chart_panel::render(f, inner, app),
        Panel::Trades => trades_panel::render(f, inner, app),
        Panel::Compare => compare_panel::render(f, inner, app),
        Panel::Help => help_panel::render(f, inner),
    }
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Shared inline error body: the message plus the offending parameters.
pub fn error_lines<'a>(app: &'a AppState, message: &'a str) -> Vec<Line<'a>> {
    vec![
        Line::from(""),
        Line::from(Span::styled(message, theme::negative())),
        Line::from(""),
        Line::from(Span::styled("Parameters used:", theme::muted())),
        Line::from(Span::styled(
            format!(
                "  symbol={} strategy={} start={:?} end={:?}",
                app.selection.symbol(),
                app.selection.strategy(),
                app.selection.start_input,
                app.selection.end_input
            ),
            theme::muted(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Check that the backend is running and dates are in the past. [r] retries.",
            theme::muted(),
        )),
    ]
}
