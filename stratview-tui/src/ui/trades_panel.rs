//! Trades panel — metrics summary grid, trade table, pagination footer.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table};
use ratatui::Frame;

use stratview_api::{MetricsSummary, TradesPage};

use crate::app::{AppState, FetchState};
use crate::format;
use crate::theme;
use crate::ui;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    match &app.trades.data {
        FetchState::Idle => {
            let hint = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "No trades loaded. [r] fetches the current selection.",
                    theme::muted(),
                )),
            ]);
            f.render_widget(hint, area);
        }
        FetchState::Loading { .. } => {
            let msg = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!(
                        "Loading trades for {} / {} (page {}) ...",
                        app.selection.symbol(),
                        app.selection.strategy(),
                        app.trades.page
                    ),
                    theme::warning(),
                )),
            ]);
            f.render_widget(msg, area);
        }
        FetchState::Failed(message) => {
            f.render_widget(Paragraph::new(ui::error_lines(app, message)), area);
        }
        FetchState::Ready(page) => render_page(f, area, app, page),
    }
}

fn render_page(f: &mut Frame, area: Rect, app: &AppState, page: &TradesPage) {
    let metrics_height = if page.metrics.is_some() { 4 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(metrics_height),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    if let Some(metrics) = &page.metrics {
        render_metrics(f, chunks[0], metrics);
    }
    render_table(f, chunks[1], page);
    render_footer(f, chunks[2], app);
}

fn metric_span(label: &str, value: String, color_by: Option<f64>) -> Vec<Span<'static>> {
    let value_style = match color_by {
        Some(v) => theme::value_style(v),
        None => theme::neutral(),
    };
    vec![
        Span::styled(format!("{label}: "), theme::muted()),
        Span::styled(value, value_style),
        Span::raw("   "),
    ]
}

fn render_metrics(f: &mut Frame, area: Rect, metrics: &MetricsSummary) {
    let mut row1 = Vec::new();
    row1.extend(metric_span(
        "Total Return",
        format::percent(metrics.total_return),
        Some(metrics.total_return),
    ));
    row1.extend(metric_span(
        "Win Rate",
        format::percent(metrics.win_rate),
        None,
    ));
    row1.extend(metric_span(
        "Max Drawdown",
        format::percent(metrics.max_drawdown),
        Some(metrics.max_drawdown),
    ));

    let mut row2 = Vec::new();
    row2.extend(metric_span(
        "Sharpe",
        format!("{:.2}", metrics.sharpe_ratio),
        Some(metrics.sharpe_ratio),
    ));
    row2.extend(metric_span("Trades", metrics.trades.to_string(), None));
    row2.extend(metric_span(
        "Avg Return/Trade",
        format::percent(metrics.avg_return_per_trade),
        Some(metrics.avg_return_per_trade),
    ));

    let lines = vec![
        Line::from(""),
        Line::from(row1),
        Line::from(row2),
        Line::from(""),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

fn render_table(f: &mut Frame, area: Rect, page: &TradesPage) {
    if page.trades.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No trades in this window.",
            theme::muted(),
        )));
        f.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Date"),
        Cell::from("Symbol"),
        Cell::from("Strategy"),
        Cell::from("Side"),
        Cell::from("Entry"),
        Cell::from("Exit"),
        Cell::from("Return"),
    ])
    .style(theme::accent_bold());

    let rows: Vec<Row> = page
        .trades
        .iter()
        .map(|trade| {
            Row::new(vec![
                Cell::from(format::short_date(trade.created_date)),
                Cell::from(trade.symbol.clone()),
                Cell::from(trade.strategy.clone()),
                Cell::from(format::side_label(trade.signal)),
                Cell::from(format::price(trade.entry_price)),
                Cell::from(format::optional_price(trade.exit_price)),
                Cell::from(Span::styled(
                    format::percent(trade.return_value),
                    theme::value_style(trade.return_value),
                )),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Length(8),
        Constraint::Length(10),
        Constraint::Length(6),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(10),
    ];
    let table = Table::new(rows, widths).header(header);
    f.render_widget(table, area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &AppState) {
    let trades = &app.trades;
    let line = Line::from(vec![
        Span::styled(" [h] prev ", theme::control_style(trades.can_prev())),
        Span::styled(
            format!(" Page {} of {} ", trades.page, trades.total_pages),
            theme::neutral(),
        ),
        Span::styled(" [l] next ", theme::control_style(trades.can_next())),
    ]);
    f.render_widget(Paragraph::new(line), area);
}
