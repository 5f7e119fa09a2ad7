//! Help panel — key bindings.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::theme;

pub fn render(f: &mut Frame, area: Rect) {
    let key = |k: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {k:<12}"), theme::accent_bold()),
            Span::styled(desc, theme::neutral()),
        ])
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("  Navigation", theme::muted())),
        key("1-4", "jump to Chart / Trades / Compare / Help"),
        key("Tab", "next panel"),
        key("Shift+Tab", "previous panel"),
        Line::from(""),
        Line::from(Span::styled("  Selection", theme::muted())),
        key("s", "cycle symbol"),
        key("x", "cycle strategy"),
        key("a", "edit start date (MM/DD/YYYY or YYYY-MM-DD)"),
        key("z", "edit end date"),
        key("r", "refresh the active panel"),
        Line::from(""),
        Line::from(Span::styled("  Trades", theme::muted())),
        key("h / Left", "previous page"),
        key("l / Right", "next page"),
        Line::from(""),
        Line::from(Span::styled("  Other", theme::muted())),
        key("e", "error history"),
        key("q", "quit"),
        Line::from(""),
        Line::from(Span::styled(
            "  Dates left empty default to the last 30 days ending yesterday.",
            theme::muted(),
        )),
    ];
    f.render_widget(Paragraph::new(lines), area);
}
