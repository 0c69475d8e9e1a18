use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::util::unicode::{byte_offset_to_display_col, display_width, truncate_to_width};

/// Rows one field takes: label, input, message
pub const FIELD_HEIGHT: u16 = 3;

const ARROW: &str = "\u{25BE}";

/// Render field `idx` into a FIELD_HEIGHT-row area and record its input row.
pub fn render_field(frame: &mut Frame, app: &mut App, idx: usize, area: Rect) {
    let Some(field) = app.fields.get(idx) else {
        return;
    };
    let theme = &app.theme;
    let bg = theme.background;
    let width = area.width as usize;
    let is_focused = idx == app.focus;
    let ta = &field.typeahead;
    let options = ta.options();

    // Label row: "Framework *" on the left, "n/max" on the right
    let label_style = if options.disabled {
        Style::default().fg(theme.dim).bg(bg)
    } else if is_focused {
        Style::default()
            .fg(theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text).bg(bg)
    };
    let mut label_spans = vec![Span::styled(format!(" {}", field.config.label), label_style)];
    if options.required && !options.disabled {
        label_spans.push(Span::styled(" *", Style::default().fg(theme.red).bg(bg)));
    }
    if let Some(max) = options.max_length {
        let counter = format!("{}/{} ", ta.draft().chars().count(), max);
        let used: usize = label_spans.iter().map(|s| display_width(&s.content)).sum();
        let counter_w = display_width(&counter);
        if used + counter_w < width {
            label_spans.push(Span::styled(
                " ".repeat(width - used - counter_w),
                Style::default().bg(bg),
            ));
            label_spans.push(Span::styled(counter, Style::default().fg(theme.dim).bg(bg)));
        }
    }

    // Input row: marker, draft (or placeholder), arrow at the right edge
    let input_area = Rect::new(area.x, area.y + 1, area.width, 1);
    let input_bg = if is_focused { theme.selection_bg } else { bg };
    let marker = if is_focused { " \u{203A} " } else { "   " };
    let text_w = width.saturating_sub(3 + 2);
    let (text, text_style) = if ta.draft().is_empty() {
        let placeholder = field.config.placeholder.as_str();
        (
            truncate_to_width(placeholder, text_w),
            Style::default()
                .fg(theme.dim)
                .bg(input_bg)
                .add_modifier(Modifier::ITALIC),
        )
    } else {
        let fg = if options.disabled { theme.dim } else { theme.text_bright };
        (
            truncate_to_width(ta.draft(), text_w),
            Style::default().fg(fg).bg(input_bg),
        )
    };
    let pad = text_w.saturating_sub(display_width(&text));
    let arrow_style = if ta.expanded() {
        Style::default().fg(theme.highlight).bg(input_bg)
    } else {
        Style::default().fg(theme.dim).bg(input_bg)
    };
    let input_line = Line::from(vec![
        Span::styled(marker, Style::default().fg(theme.highlight).bg(input_bg)),
        Span::styled(text, text_style),
        Span::styled(" ".repeat(pad), Style::default().bg(input_bg)),
        Span::styled(format!("{} ", ARROW), arrow_style),
    ]);

    // Message row: validation error
    let message_line = match &options.error {
        Some(error) => Line::from(Span::styled(
            truncate_to_width(&format!("   \u{2717} {}", error), width),
            Style::default().fg(theme.red).bg(bg),
        )),
        None => Line::from(Span::styled("", Style::default().bg(bg))),
    };

    let cursor = (is_focused && !options.disabled && options.allow_custom).then(|| {
        let col = byte_offset_to_display_col(ta.draft(), ta.cursor()).min(text_w) as u16;
        (input_area.x + 3 + col, input_area.y)
    });

    let paragraph = Paragraph::new(vec![Line::from(label_spans), input_line, message_line])
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
    if let Some(position) = cursor {
        frame.set_cursor_position(position);
    }

    if let Some(slot) = app.screen.inputs.get_mut(idx) {
        *slot = Some(input_area);
    }
}
