//! Comparison panel — strategies ranked by total return.

use ratatui::layout::{Constraint, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table};
use ratatui::Frame;

use stratview_api::ComparisonEntry;

use crate::app::{AppState, FetchState};
use crate::format;
use crate::theme;
use crate::ui;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    match &app.compare.entries {
        FetchState::Idle => {
            let hint = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "No comparison loaded. [r] fetches all strategies for the current symbol.",
                    theme::muted(),
                )),
            ]);
            f.render_widget(hint, area);
        }
        FetchState::Loading { .. } => {
            let msg = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!("Comparing strategies for {} ...", app.selection.symbol()),
                    theme::warning(),
                )),
            ]);
            f.render_widget(msg, area);
        }
        FetchState::Failed(message) => {
            f.render_widget(Paragraph::new(ui::error_lines(app, message)), area);
        }
        FetchState::Ready(entries) => render_ranking(f, area, entries),
    }
}

fn render_ranking(f: &mut Frame, area: Rect, entries: &[ComparisonEntry]) {
    if entries.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No strategies returned for this window.",
            theme::muted(),
        )));
        f.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("#"),
        Cell::from("Strategy"),
        Cell::from("Total Return"),
        Cell::from("Win Rate"),
        Cell::from("Sharpe"),
        Cell::from("Max Drawdown"),
        Cell::from("Trades"),
    ])
    .style(theme::accent_bold());

    let rows: Vec<Row> = entries
        .iter()
        .enumerate()
        .map(|(rank, entry)| {
            // Rank 1 is the best performer; highlight its name.
            let name_style = if rank == 0 {
                theme::accent_bold()
            } else {
                theme::neutral()
            };
            Row::new(vec![
                Cell::from((rank + 1).to_string()),
                Cell::from(Span::styled(entry.strategy.clone(), name_style)),
                Cell::from(Span::styled(
                    format::percent(entry.total_return),
                    theme::value_style(entry.total_return),
                )),
                Cell::from(format::percent(entry.win_rate)),
                Cell::from(format!("{:.2}", entry.sharpe_ratio)),
                Cell::from(Span::styled(
                    format::percent(entry.max_drawdown),
                    theme::value_style(entry.max_drawdown),
                )),
                Cell::from(entry.trades.to_string()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(3),
        Constraint::Length(12),
        Constraint::Length(14),
        Constraint::Length(10),
        Constraint::Length(8),
        Constraint::Length(14),
        Constraint::Length(8),
    ];
    let table = Table::new(rows, widths).header(header);
    f.render_widget(table, area);
}
