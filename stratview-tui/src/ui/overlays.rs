//! Popup overlays — date entry and error history.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::app::{AppState, DateField};
use crate::theme;
use crate::ui::centered_rect;

pub fn render_date_entry(f: &mut Frame, area: Rect, field: DateField, buffer: &str) {
    let title = match field {
        DateField::Start => " Start Date ",
        DateField::End => " End Date ",
    };
    let popup = centered_rect(40, 20, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(title)
        .title_style(theme::panel_title(true));
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let lines = vec![
        Line::from(vec![
            Span::styled("> ", theme::accent_bold()),
            Span::styled(buffer.to_string(), theme::neutral()),
            Span::styled("_", theme::accent()),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "MM/DD/YYYY or YYYY-MM-DD. Empty clears the field.",
            theme::muted(),
        )),
        Line::from(Span::styled(
            "[Enter] apply  [Esc] cancel",
            theme::muted(),
        )),
    ];
    f.render_widget(Paragraph::new(lines), inner);
}

pub fn render_error_history(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(70, 60, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(format!(" Error History ({}) ", app.error_history.len()))
        .title_style(theme::panel_title(true));
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    if app.error_history.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No errors recorded.",
            theme::muted(),
        )));
        f.render_widget(empty, inner);
        return;
    }

    // The history front is the newest record; offset by the scroll position.
    let lines: Vec<Line> = app
        .error_history
        .iter()
        .skip(app.error_scroll)
        .take(inner.height as usize)
        .map(|record| {
            Line::from(vec![
                Span::styled(
                    record.timestamp.format("%H:%M:%S ").to_string(),
                    theme::muted(),
                ),
                Span::styled(format!("{:<5}", record.category.label()), theme::warning()),
                Span::styled(record.message.clone(), theme::negative()),
                Span::styled(format!("  ({})", record.context), theme::muted()),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}
