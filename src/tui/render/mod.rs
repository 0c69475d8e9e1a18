pub mod field_view;
pub mod panel;
pub mod status_row;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use super::app::{App, ScreenMap};
use field_view::FIELD_HEIGHT;

/// Main render function
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: title (2 rows) | fields | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // title + separator
            Constraint::Min(1),    // fields
            Constraint::Length(1), // status row
        ])
        .split(area);

    render_title(frame, app, chunks[0]);

    // Hit-test map is rebuilt every frame
    app.screen = ScreenMap {
        inputs: vec![None; app.fields.len()],
        ..ScreenMap::default()
    };

    let content = chunks[1];
    let fields = visible_fields(app.fields.len(), app.focus, content.height);
    for (slot, idx) in fields.enumerate() {
        let field_area = Rect::new(
            content.x,
            content.y + slot as u16 * FIELD_HEIGHT,
            content.width,
            FIELD_HEIGHT.min(content.height.saturating_sub(slot as u16 * FIELD_HEIGHT)),
        );
        field_view::render_field(frame, app, idx, field_area);
    }

    // Candidate panel (rendered on top of the fields below it)
    if let Some(input) = app.screen.inputs.get(app.focus).copied().flatten() {
        panel::render_panel(frame, app, input);
    }

    status_row::render_status_row(frame, app, chunks[2]);
}

/// Field indices that fit in `height` rows, scrolled to keep `focus` in view
fn visible_fields(count: usize, focus: usize, height: u16) -> std::ops::Range<usize> {
    let per_page = ((height / FIELD_HEIGHT) as usize).max(1);
    let start = if focus >= per_page { focus + 1 - per_page } else { 0 };
    start..count.min(start + per_page)
}

fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let title = Line::from(Span::styled(
        format!(" {}", app.title),
        Style::default()
            .fg(app.theme.highlight)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    ));
    let separator = Line::from(Span::styled(
        "\u{2500}".repeat(area.width as usize),
        Style::default().fg(app.theme.dim).bg(bg),
    ));
    frame.render_widget(Paragraph::new(vec![title, separator]), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::typeahead::Direction as Nav;
    use pretty_assertions::assert_eq;
    use std::time::Instant;
    use super::test_helpers::{TERM_H, TERM_W, app_from_toml, render_to_string, template_app};

    #[test]
    fn scrolls_fields_to_keep_focus_visible() {
        assert_eq!(visible_fields(5, 0, 21), 0..5);
        assert_eq!(visible_fields(5, 0, 9), 0..3);
        assert_eq!(visible_fields(5, 3, 9), 1..4);
        assert_eq!(visible_fields(5, 4, 9), 2..5);
        assert_eq!(visible_fields(5, 2, 1), 2..3);
    }

    #[test]
    fn full_form_layout() {
        let mut app = template_app();
        let output = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &mut app));
        assert!(output.starts_with(" New project"));
        assert!(output.contains(" Project name *"));
        assert!(output.contains(" Language"));
        assert!(output.contains(" UI tools"));
        assert!(output.contains("Select UI tool"));
        assert!(output.contains("^Q quit"));

        // Title takes two rows, each field three
        assert_eq!(app.screen.inputs[0], Some(Rect::new(0, 3, TERM_W, 1)));
        assert_eq!(app.screen.inputs[4], Some(Rect::new(0, 15, TERM_W, 1)));
        // Empty suggestion box: no panel
        assert_eq!(app.screen.panel, None);
    }

    #[test]
    fn focused_dropdown_draws_panel_over_next_field() {
        let now = Instant::now();
        let mut app = template_app();
        app.set_focus(1, now);
        app.fields[1].typeahead.navigate(Nav::Down);
        let output = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &mut app));
        assert!(output.contains(" \u{25B8} HTML"));
        assert!(output.contains("   Javascript"));
        assert!(output.contains("   Typescript"));
        assert_eq!(app.screen.panel.map(|r| r.y), Some(7));
        assert_eq!(app.screen.panel_row_at(5, 9), Some(1));
    }

    #[test]
    fn suggestions_appear_after_typing() {
        let mut app = template_app();
        let n = app.fields[0].typeahead.set_draft("Re");
        app.apply(0, n);
        let output = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &mut app));
        assert!(output.contains("Recipe book"));
        assert!(!output.contains("Task tracker"));
    }

    #[test]
    fn custom_text_hint() {
        let now = Instant::now();
        let mut app = template_app();
        app.set_focus(2, now);
        let n = app.fields[2].typeahead.set_draft("Svelte");
        app.apply(2, n);
        let output = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &mut app));
        assert!(output.contains("Press Enter to use \"Svelte\""));
    }

    #[test]
    fn status_message_shows() {
        let now = Instant::now();
        let mut app = template_app();
        app.submit(now);
        let output = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &mut app));
        assert!(output.contains("1 required field(s) missing"));
        assert!(output.contains("Project name is required"));
    }

    #[test]
    fn many_fields_scroll() {
        let mut toml = String::from("[form]\nname = \"Long\"\n");
        for i in 0..10 {
            toml.push_str(&format!(
                "\n[[fields]]\nid = \"f{i}\"\nlabel = \"Field {i}\"\n"
            ));
        }
        let mut app = app_from_toml(&toml);
        let now = Instant::now();
        app.set_focus(9, now);
        let output = render_to_string(TERM_W, 12, |frame, _| render(frame, &mut app));
        assert!(output.contains("Field 9"));
        assert!(!output.contains("Field 0"));
        assert_eq!(app.screen.inputs[0], None);
        assert!(app.screen.inputs[9].is_some());
    }
}
