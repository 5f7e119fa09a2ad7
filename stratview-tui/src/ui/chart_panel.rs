//! Chart panel — stacked price, returns, and optional RSI charts.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Chart, Dataset, GraphType, Paragraph};
use ratatui::Frame;

use crate::app::{AppState, FetchState};
use crate::chart::{self, ChartView, PlotSeries, RsiView};
use crate::theme;
use crate::ui;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    match &app.chart.series {
        FetchState::Idle => {
            let hint = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "No data loaded. [r] fetches the current selection.",
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
                        "Loading {} / {} ...",
                        app.selection.symbol(),
                        app.selection.strategy()
                    ),
                    theme::warning(),
                )),
            ]);
            f.render_widget(msg, area);
        }
        FetchState::Failed(message) => {
            f.render_widget(Paragraph::new(ui::error_lines(app, message)), area);
        }
        FetchState::Ready(series) => {
            let view = chart::build(series);
            render_charts(f, area, &view);
        }
    }
}

fn render_charts(f: &mut Frame, area: Rect, view: &ChartView) {
    let constraints: Vec<Constraint> = if view.rsi.is_some() {
        vec![
            Constraint::Percentage(45),
            Constraint::Percentage(30),
            Constraint::Percentage(25),
        ]
    } else {
        vec![Constraint::Percentage(60), Constraint::Percentage(40)]
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    render_price_chart(f, chunks[0], view);
    render_returns_chart(f, chunks[1], view);
    if let Some(rsi) = &view.rsi {
        render_rsi_chart(f, chunks[2], view, rsi);
    }
}

fn line_dataset<'a>(series: &'a PlotSeries, style: Style) -> Dataset<'a> {
    Dataset::default()
        .name(series.label)
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(style)
        .data(&series.points)
}

fn marker_dataset<'a>(series: &'a PlotSeries, style: Style) -> Dataset<'a> {
    Dataset::default()
        .name(series.label)
        .marker(symbols::Marker::Dot)
        .graph_type(GraphType::Scatter)
        .style(style)
        .data(&series.points)
}

fn x_axis(view: &ChartView) -> Axis<'_> {
    Axis::default()
        .style(theme::muted())
        .bounds(view.x_bounds)
        .labels(vec![
            Span::styled(view.x_labels.0.clone(), theme::muted()),
            Span::styled(view.x_labels.1.clone(), theme::muted()),
        ])
}

fn render_price_chart(f: &mut Frame, area: Rect, view: &ChartView) {
    let datasets = vec![
        line_dataset(&view.price, theme::accent()),
        marker_dataset(&view.buys, theme::positive()),
        marker_dataset(&view.sells, theme::negative()),
    ];
    let [lo, hi] = view.price_bounds;
    let chart = Chart::new(datasets)
        .x_axis(x_axis(view))
        .y_axis(
            Axis::default()
                .style(theme::muted())
                .bounds(view.price_bounds)
                .labels(vec![
                    Span::styled(format!("{lo:.2}"), theme::muted()),
                    Span::styled(format!("{hi:.2}"), theme::muted()),
                ]),
        );
    f.render_widget(chart, area);
}

fn render_returns_chart(f: &mut Frame, area: Rect, view: &ChartView) {
    let datasets = vec![line_dataset(&view.returns, theme::neutral())];
    let [lo, hi] = view.returns_bounds;
    let chart = Chart::new(datasets)
        .x_axis(x_axis(view))
        .y_axis(
            Axis::default()
                .style(theme::muted())
                .bounds(view.returns_bounds)
                .labels(vec![
                    Span::styled(format!("{:.1}%", lo * 100.0), theme::muted()),
                    Span::styled(format!("{:.1}%", hi * 100.0), theme::muted()),
                ]),
        );
    f.render_widget(chart, area);
}

fn render_rsi_chart(f: &mut Frame, area: Rect, view: &ChartView, rsi: &RsiView) {
    let datasets = vec![
        line_dataset(&rsi.line, theme::accent()),
        line_dataset(&rsi.overbought, theme::negative()),
        line_dataset(&rsi.oversold, theme::positive()),
    ];
    let chart = Chart::new(datasets)
        .x_axis(x_axis(view))
        .y_axis(
            Axis::default()
                .style(theme::muted())
                .bounds([0.0, 100.0])
                .labels(vec![
                    Span::styled("0", theme::muted()),
                    Span::styled("50", theme::muted()),
                    Span::styled("100", theme::muted()),
                ]),
        );
    f.render_widget(chart, area);
}
