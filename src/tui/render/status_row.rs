use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;

const KEY_HINTS: &str = "Tab next  \u{2191}\u{2193} choose  Enter pick  Esc hide  ^S submit  ^Q quit";

/// Render the status row (bottom of screen): the last message on the left,
/// key hints on the right when they fit.
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut spans = Vec::new();
    if let Some(status) = &app.status {
        spans.push(Span::styled(
            format!(" {}", status),
            Style::default().fg(app.theme.highlight).bg(bg),
        ));
    }
    let content_width: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let hint_width = KEY_HINTS.chars().count();
    if content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(
            KEY_HINTS,
            Style::default().fg(app.theme.dim).bg(bg),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
