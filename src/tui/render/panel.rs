use std::ops::Range;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::ops::typeahead::Typeahead;
use crate::tui::app::App;
use crate::util::unicode::{display_width, truncate_to_width};

/// One line inside the candidate panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelLine {
    /// Category header (category sort only)
    Header(String),
    /// A visible row, by its index in the visible list
    Row(usize),
    /// Free text that matches nothing but can be accepted
    Hint(String),
}

/// Lines the panel would show, before scrolling
pub fn panel_lines(ta: &Typeahead) -> Vec<PanelLine> {
    if let Some(text) = ta.custom_hint() {
        return vec![PanelLine::Hint(text.to_string())];
    }
    if !ta.panel_visible() {
        return Vec::new();
    }
    match ta.groups() {
        Some(groups) => groups
            .into_iter()
            .flat_map(|g| {
                std::iter::once(PanelLine::Header(g.name))
                    .chain(g.rows.into_iter().map(PanelLine::Row))
            })
            .collect(),
        None => (0..ta.visible_len()).map(PanelLine::Row).collect(),
    }
}

/// Window of at most `max` lines that keeps the highlighted row in view
pub fn scroll_window(lines: &[PanelLine], highlighted: Option<usize>, max: usize) -> Range<usize> {
    let total = lines.len();
    if total <= max {
        return 0..total;
    }
    let target = highlighted
        .and_then(|h| lines.iter().position(|l| *l == PanelLine::Row(h)))
        .unwrap_or(0);
    let start = if target >= max { target + 1 - max } else { 0 };
    start..start + max
}

/// Render the focused field's candidate panel below (or above) its input,
/// and record where it went for mouse hit-testing.
pub fn render_panel(frame: &mut Frame, app: &mut App, input_area: Rect) {
    let Some(field) = app.focused() else {
        return;
    };
    let ta = &field.typeahead;
    let lines = panel_lines(ta);
    if lines.is_empty() {
        return;
    }
    let window = scroll_window(&lines, ta.highlighted(), app.max_visible);
    let shown = &lines[window];

    let theme = &app.theme;
    let bg = theme.background;

    let widest = shown
        .iter()
        .map(|line| match line {
            PanelLine::Header(name) => display_width(name) + 1,
            PanelLine::Row(row) => ta.visible_at(*row).map_or(0, |c| {
                display_width(c.display_label())
                    + c.icon.as_deref().map_or(0, |i| display_width(i) + 1)
            }) + 3,
            PanelLine::Hint(text) => display_width(text) + 22,
        })
        .max()
        .unwrap_or(10)
        + 2;

    let term_area = frame.area();
    let popup_w = (widest as u16)
        .max(input_area.width.min(24))
        .min(term_area.width.saturating_sub(input_area.x))
        .max(4);
    let popup_h = shown.len() as u16 + 2; // +2 for borders
    let inner_w = popup_w.saturating_sub(2) as usize;

    // Below the input if it fits, otherwise above
    let y = if input_area.y + 1 + popup_h <= term_area.height {
        input_area.y + 1
    } else {
        input_area.y.saturating_sub(popup_h)
    };
    let popup_area = Rect::new(input_area.x, y, popup_w, popup_h);

    let mut rendered: Vec<Line> = Vec::with_capacity(shown.len());
    for line in shown {
        match line {
            PanelLine::Header(name) => {
                let style = Style::default()
                    .fg(theme.dim)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD);
                rendered.push(Line::from(Span::styled(
                    truncate_to_width(&format!(" {}", name), inner_w),
                    style,
                )));
            }
            PanelLine::Row(row) => {
                let Some(candidate) = ta.visible_at(*row) else {
                    continue;
                };
                let is_highlighted = ta.highlighted() == Some(*row);
                let is_committed = candidate.value == ta.committed();
                let mut style = if is_highlighted {
                    Style::default()
                        .fg(theme.text_bright)
                        .bg(theme.selection_bg)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme.text).bg(bg)
                };
                if is_committed {
                    style = style.fg(theme.highlight);
                }
                let prefix = if is_highlighted { " \u{25B8} " } else { "   " };
                let text = match &candidate.icon {
                    Some(icon) => format!("{} {}", icon, candidate.display_label()),
                    None => candidate.display_label().to_string(),
                };
                let text = truncate_to_width(&text, inner_w.saturating_sub(3));
                let pad = inner_w.saturating_sub(3 + display_width(&text));
                rendered.push(Line::from(vec![
                    Span::styled(prefix, style),
                    Span::styled(format!("{}{}", text, " ".repeat(pad)), style),
                ]));
            }
            PanelLine::Hint(text) => {
                let text = format!(" Press Enter to use \"{}\"", text);
                rendered.push(Line::from(Span::styled(
                    truncate_to_width(&text, inner_w),
                    Style::default().fg(theme.dim).bg(bg),
                )));
            }
        }
    }

    frame.render_widget(Clear, popup_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.dim).bg(bg))
        .style(Style::default().bg(bg));
    let paragraph = Paragraph::new(rendered)
        .block(block)
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, popup_area);

    let rows = shown
        .iter()
        .map(|line| match line {
            PanelLine::Row(row) => Some(*row),
            _ => None,
        })
        .collect();
    app.screen.panel = Some(popup_area);
    app.screen.panel_rows = rows;
}
