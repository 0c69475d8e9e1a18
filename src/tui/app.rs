use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use indexmap::IndexMap;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use tracing::{debug, info};

use crate::model::config::{FieldConfig, FormConfig};
use crate::ops::typeahead::{Notification, Typeahead, TypeaheadOptions};

use super::input;
use super::render;
use super::theme::Theme;

/// Longest the event loop sleeps when no close is pending
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Committed values in form order, keyed by field id
pub type Submission = IndexMap<String, String>;

/// One form field: its static config, its widget, and the value the form
/// has received from the widget
pub struct FieldState {
    pub config: FieldConfig,
    pub typeahead: Typeahead,
    pub value: String,
}

/// Where things were drawn last frame, for mouse hit-testing
#[derive(Debug, Clone, Default)]
pub struct ScreenMap {
    /// Input row per field (None when scrolled off)
    pub inputs: Vec<Option<Rect>>,
    /// Panel of the focused field, borders included
    pub panel: Option<Rect>,
    /// For each line inside the panel border: the visible row it shows
    pub panel_rows: Vec<Option<usize>>,
}

impl ScreenMap {
    /// Visible row under a screen position inside the panel
    pub fn panel_row_at(&self, x: u16, y: u16) -> Option<usize> {
        use crate::ops::region::HitRegion;
        let panel = self.panel?;
        if !panel.contains_point(x, y) || y == panel.y {
            return None;
        }
        let line = (y - panel.y - 1) as usize;
        self.panel_rows.get(line).copied().flatten()
    }
}

/// Main application state
pub struct App {
    pub title: String,
    pub fields: Vec<FieldState>,
    /// Index of the focused field
    pub focus: usize,
    pub theme: Theme,
    pub max_visible: usize,
    pub status: Option<String>,
    pub should_quit: bool,
    pub submitted: Option<Submission>,
    pub screen: ScreenMap,
}

impl App {
    pub fn new(config: FormConfig) -> Self {
        let theme = Theme::from_config(&config.ui);
        let fields = config
            .fields
            .into_iter()
            .map(|field| {
                let options = TypeaheadOptions::from_field(&field, &config.typeahead);
                let typeahead = Typeahead::new(field.value.clone(), field.candidates(), options);
                FieldState {
                    value: field.value.clone(),
                    config: field,
                    typeahead,
                }
            })
            .collect();

        let mut app = App {
            title: config.form.name,
            fields,
            focus: 0,
            theme,
            max_visible: config.typeahead.max_visible.max(1),
            status: None,
            should_quit: false,
            submitted: None,
            screen: ScreenMap::default(),
        };
        if let Some(field) = app.fields.first_mut() {
            field.typeahead.focus();
        }
        app
    }

    pub fn focused(&self) -> Option<&FieldState> {
        self.fields.get(self.focus)
    }

    pub fn focused_mut(&mut self) -> Option<&mut FieldState> {
        self.fields.get_mut(self.focus)
    }

    /// Move focus to field `idx`: the old field blurs (and closes after the
    /// delay), the new one focuses.
    pub fn set_focus(&mut self, idx: usize, now: Instant) {
        if idx >= self.fields.len() || idx == self.focus {
            return;
        }
        self.fields[self.focus].typeahead.blur(now);
        self.focus = idx;
        self.fields[idx].typeahead.focus();
        debug!(field = %self.fields[idx].config.id, "focus moved");
    }

    pub fn focus_next(&mut self, now: Instant) {
        if !self.fields.is_empty() {
            self.set_focus((self.focus + 1) % self.fields.len(), now);
        }
    }

    pub fn focus_prev(&mut self, now: Instant) {
        if !self.fields.is_empty() {
            let n = self.fields.len();
            self.set_focus((self.focus + n - 1) % n, now);
        }
    }

    /// Forward a widget notification to the form, then hand the form's
    /// value back to the widget the way a parent re-render would.
    pub fn apply(&mut self, idx: usize, notification: Option<Notification>) {
        let Some(notification) = notification else {
            return;
        };
        let Some(field) = self.fields.get_mut(idx) else {
            return;
        };
        match notification {
            Notification::ValueChanged(value) => {
                field.value = value;
                if !field.value.is_empty() {
                    field.typeahead.set_error(None);
                }
                self.status = None;
            }
            Notification::Cleared => {
                field.value.clear();
                self.status = None;
            }
            Notification::EnterWithNoMatch => {
                self.status = Some(format!("Pick one of the listed {} options", field.config.label));
            }
        }
        let value = field.value.clone();
        field.typeahead.sync_external(&value);
    }

    /// Fire due blur-closes. Returns true if anything closed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        for field in &mut self.fields {
            changed |= field.typeahead.tick(now);
        }
        changed
    }

    /// Soonest pending close across all fields
    pub fn next_deadline(&self, now: Instant) -> Option<Duration> {
        self.fields
            .iter()
            .filter_map(|f| f.typeahead.close_remaining(now))
            .min()
    }

    /// Validate required fields and, if all are filled, finish the form.
    pub fn submit(&mut self, now: Instant) -> bool {
        let mut first_missing = None;
        for (i, field) in self.fields.iter_mut().enumerate() {
            let missing = field.config.required
                && !field.config.disabled
                && field.value.trim().is_empty();
            if missing {
                field
                    .typeahead
                    .set_error(Some(format!("{} is required", field.config.label)));
                first_missing.get_or_insert(i);
            }
        }

        if let Some(idx) = first_missing {
            let count = self.fields.iter().filter(|f| f.typeahead.invalid()).count();
            self.status = Some(format!("{} required field(s) missing", count));
            self.set_focus(idx, now);
            return false;
        }

        let values: Submission = self
            .fields
            .iter()
            .map(|f| (f.config.id.clone(), f.value.clone()))
            .collect();
        info!(fields = values.len(), "form submitted");
        self.submitted = Some(values);
        self.should_quit = true;
        true
    }
}

/// Run the TUI form. Returns the submitted values, or None if the user quit.
pub fn run(config: FormConfig) -> Result<Option<Submission>, Box<dyn std::error::Error>> {
    let mut app = App::new(config);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result.map(|_| app.submitted)
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        let now = Instant::now();
        app.tick(now);
        terminal.draw(|frame| render::render(frame, app))?;

        // Wake up in time for the next pending close
        let timeout = app
            .next_deadline(now)
            .map_or(IDLE_POLL, |d| d.min(IDLE_POLL));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key, Instant::now());
                }
                Event::Mouse(mouse) => input::handle_mouse(app, mouse, Instant::now()),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::config_io::{TEMPLATE, parse_form};
    use pretty_assertions::assert_eq;

    fn template_app() -> App {
        App::new(parse_form(TEMPLATE).unwrap())
    }

    #[test]
    fn first_field_starts_focused() {
        let app = template_app();
        assert_eq!(app.focus, 0);
        assert!(app.fields[0].typeahead.is_focused());
        // Empty suggestion box has nothing to show yet
        assert!(!app.fields[0].typeahead.is_open());
    }

    #[test]
    fn focus_change_blurs_with_delay() {
        let t0 = Instant::now();
        let mut app = template_app();
        app.set_focus(1, t0);
        assert!(app.fields[1].typeahead.is_open());
        app.set_focus(2, t0);
        assert!(app.fields[1].typeahead.is_open());
        assert_eq!(app.next_deadline(t0), Some(Duration::from_millis(300)));
        assert!(app.tick(t0 + Duration::from_millis(300)));
        assert!(!app.fields[1].typeahead.is_open());
        assert!(app.fields[2].typeahead.is_open());
    }

    #[test]
    fn focus_wraps_both_ways() {
        let t0 = Instant::now();
        let mut app = template_app();
        app.focus_prev(t0);
        assert_eq!(app.focus, app.fields.len() - 1);
        app.focus_next(t0);
        assert_eq!(app.focus, 0);
    }

    #[test]
    fn notifications_update_form_value() {
        let mut app = template_app();
        let n = app.fields[1].typeahead.select(0);
        app.apply(1, n);
        assert_eq!(app.fields[1].value, "HTML");
        let n = app.fields[1].typeahead.clear();
        app.apply(1, n);
        assert_eq!(app.fields[1].value, "");
    }

    #[test]
    fn enter_with_no_match_sets_status() {
        let mut app = template_app();
        app.apply(1, Some(Notification::EnterWithNoMatch));
        assert_eq!(app.status.as_deref(), Some("Pick one of the listed Language options"));
        assert_eq!(app.fields[1].value, "");
    }

    #[test]
    fn submit_requires_required_fields() {
        let t0 = Instant::now();
        let mut app = template_app();
        app.set_focus(2, t0);
        assert!(!app.submit(t0));
        assert_eq!(app.focus, 0);
        assert!(app.fields[0].typeahead.invalid());
        assert_eq!(app.status.as_deref(), Some("1 required field(s) missing"));

        let n = app.fields[0].typeahead.set_draft("Chat app");
        app.apply(0, n);
        assert!(!app.fields[0].typeahead.invalid());
        assert!(app.submit(t0));
        let submitted = app.submitted.unwrap();
        assert_eq!(submitted.get("name").map(String::as_str), Some("Chat app"));
        assert_eq!(
            submitted.keys().cloned().collect::<Vec<_>>(),
            vec!["name", "language", "framework", "styling", "ui_tools"]
        );
    }

    #[test]
    fn panel_row_lookup_skips_border() {
        let map = ScreenMap {
            inputs: vec![],
            panel: Some(Rect::new(2, 5, 20, 4)),
            panel_rows: vec![None, Some(0)],
        };
        assert_eq!(map.panel_row_at(3, 5), None);
        assert_eq!(map.panel_row_at(3, 6), None);
        assert_eq!(map.panel_row_at(3, 7), Some(0));
        assert_eq!(map.panel_row_at(3, 8), None);
        assert_eq!(map.panel_row_at(30, 7), None);
    }
}
