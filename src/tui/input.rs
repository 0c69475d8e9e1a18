use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::ops::region::{HitRegion, OutsidePointer, Region};
use crate::ops::typeahead::Direction;

use super::app::App;

/// Handle a key event for the focused field
pub fn handle_key(app: &mut App, key: KeyEvent, now: Instant) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    // Form-level keys first
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) | (KeyModifiers::CONTROL, KeyCode::Char('q')) => {
            app.should_quit = true;
            return;
        }
        (KeyModifiers::CONTROL, KeyCode::Char('s')) => {
            app.submit(now);
            return;
        }
        (_, KeyCode::Tab) => {
            app.focus_next(now);
            return;
        }
        (_, KeyCode::BackTab) => {
            app.focus_prev(now);
            return;
        }
        _ => {}
    }

    let idx = app.focus;
    let Some(field) = app.focused_mut() else {
        return;
    };
    let ta = &mut field.typeahead;

    let notification = match (key.modifiers, key.code) {
        (KeyModifiers::ALT, KeyCode::Down) => {
            ta.toggle();
            None
        }
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => ta.clear(),
        (_, KeyCode::Down) => {
            // Arrow keys belong to the list while it is showing; otherwise
            // they walk between fields.
            if !ta.navigate(Direction::Down) {
                app.focus_next(now);
            }
            return;
        }
        (_, KeyCode::Up) => {
            if !ta.navigate(Direction::Up) {
                app.focus_prev(now);
            }
            return;
        }
        (_, KeyCode::Enter) => ta.commit_highlighted(),
        (_, KeyCode::Esc) => {
            ta.dismiss();
            None
        }
        (_, KeyCode::Backspace) => ta.backspace(),
        (_, KeyCode::Delete) => ta.delete(),
        (_, KeyCode::Left) => {
            ta.move_left();
            None
        }
        (_, KeyCode::Right) => {
            ta.move_right();
            None
        }
        (_, KeyCode::Home) => {
            ta.move_home();
            None
        }
        (_, KeyCode::End) => {
            ta.move_end();
            None
        }
        (KeyModifiers::NONE, KeyCode::Char(c)) | (KeyModifiers::SHIFT, KeyCode::Char(c)) => {
            ta.insert_char(c)
        }
        _ => None,
    };
    app.apply(idx, notification);
}

/// Handle a mouse event: row clicks select, field clicks focus, anything
/// else dismisses the focused field's panel.
pub fn handle_mouse(app: &mut App, mouse: MouseEvent, now: Instant) {
    let (x, y) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let idx = app.focus;

            if let Some(row) = app.screen.panel_row_at(x, y) {
                if let Some(field) = app.focused_mut() {
                    let n = field.typeahead.select(row);
                    app.apply(idx, n);
                }
                return;
            }

            let target = OutsidePointer {
                input: app.screen.inputs.get(idx).copied().flatten().map(Region::from),
                panel: app.screen.panel.map(Region::from),
            };
            if let Some(field) = app.focused_mut() {
                field.typeahead.pointer_down(&target, x, y);
            }

            let clicked = app
                .screen
                .inputs
                .iter()
                .position(|r| r.is_some_and(|r| r.contains_point(x, y)));
            match clicked {
                Some(i) if i == idx => {
                    if let Some(field) = app.focused_mut() {
                        field.typeahead.focus();
                    }
                }
                Some(i) => app.set_focus(i, now),
                None => {}
            }
        }
        MouseEventKind::Moved => {
            if let Some(row) = app.screen.panel_row_at(x, y)
                && let Some(field) = app.focused_mut()
            {
                field.typeahead.hover(row);
            }
        }
        _ => {}
    }
}
