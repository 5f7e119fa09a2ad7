//! Bottom status bar — key hints and the latest status message.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{AppState, StatusLevel};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans = vec![Span::styled(
        " [1]Chart [2]Trades [3]Compare [4]Help  [s]ymbol [x]strategy [a/z]dates [r]efresh [e]rrors [q]uit ",
        theme::muted(),
    )];

    if let Some((message, level)) = &app.status_message {
        let style = match level {
            StatusLevel::Info => theme::neutral(),
            StatusLevel::Warning => theme::warning(),
            StatusLevel::Error => theme::negative(),
        };
        spans.push(Span::styled("| ", theme::muted()));
        spans.push(Span::styled(message.clone(), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
