//! The typeahead selection state machine.
//!
//! One `Typeahead` backs both the dropdown combo-box and the free-text
//! suggestion box. The host feeds it keystrokes, pointer and focus events;
//! every operation that changes the committed value hands back exactly one
//! [`Notification`] for the host to forward to its form.
//!
//! Two rules are easy to regress and are kept explicit here:
//! - reopening never filters by the committed value ([`Typeahead::should_filter`]),
//! - a blur closes the panel only after a delay ([`CloseTimer`]), so a
//!   pointer selection that races the blur still lands.

use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::model::candidate::{Candidate, FieldKind, SortMode};
use crate::model::config::{FieldConfig, TypeaheadConfig};
use crate::util::unicode::{next_grapheme_boundary, prev_grapheme_boundary};

use super::close_timer::{CloseTimer, DEFAULT_CLOSE_DELAY};
use super::listing::{Group, group_by_category, visible_indices};
use super::region::OutsidePointer;

/// Collaborator-supplied configuration
#[derive(Debug, Clone)]
pub struct TypeaheadOptions {
    /// Field id, used only for logging
    pub id: String,
    pub kind: FieldKind,
    /// Whether typed text may become the committed value
    pub allow_custom: bool,
    pub sort: SortMode,
    pub disabled: bool,
    pub required: bool,
    /// Validation message rendered as-is
    pub error: Option<String>,
    /// Maximum draft length in characters
    pub max_length: Option<usize>,
    pub close_delay: Duration,
}

impl Default for TypeaheadOptions {
    fn default() -> Self {
        TypeaheadOptions {
            id: String::new(),
            kind: FieldKind::Dropdown,
            allow_custom: false,
            sort: SortMode::Custom,
            disabled: false,
            required: false,
            error: None,
            max_length: None,
            close_delay: DEFAULT_CLOSE_DELAY,
        }
    }
}

impl TypeaheadOptions {
    pub fn from_field(field: &FieldConfig, typeahead: &TypeaheadConfig) -> Self {
        TypeaheadOptions {
            id: field.id.clone(),
            kind: field.kind,
            allow_custom: field.allows_custom(),
            sort: field.sort,
            disabled: field.disabled,
            required: field.required,
            error: None,
            max_length: field.max_length,
            close_delay: typeahead.close_delay(),
        }
    }
}

/// Outbound events for the host form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// The committed value changed
    ValueChanged(String),
    /// The field was cleared; the committed value is now empty
    Cleared,
    /// Enter with nothing highlighted on a field that rejects free text
    EnterWithNoMatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Why the panel is closing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// Input lost focus; closes after the configured delay
    Blur,
    Selection,
    OutsidePointer,
    Escape,
}

#[derive(Debug, Clone)]
pub struct Typeahead {
    options: TypeaheadOptions,
    candidates: Vec<Candidate>,
    /// Value reported upward
    committed: String,
    /// Text shown in the input
    draft: String,
    /// Last value committed by selection, accepted text, close, or sync.
    /// Filtering is skipped while the draft equals it.
    settled: String,
    /// Byte offset into `draft`
    cursor: usize,
    open: bool,
    focused: bool,
    highlighted: Option<usize>,
    /// Candidate indices in display order
    visible: Vec<usize>,
    close_timer: CloseTimer,
}

impl Typeahead {
    pub fn new(value: impl Into<String>, candidates: Vec<Candidate>, options: TypeaheadOptions) -> Self {
        let value = value.into();
        let mut ta = Typeahead {
            close_timer: CloseTimer::new(options.close_delay),
            options,
            candidates,
            cursor: value.len(),
            committed: value.clone(),
            draft: value.clone(),
            settled: value,
            open: false,
            focused: false,
            highlighted: None,
            visible: Vec::new(),
        };
        ta.recompute();
        ta
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    pub fn options(&self) -> &TypeaheadOptions {
        &self.options
    }

    pub fn committed(&self) -> &str {
        &self.committed
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Candidates currently listed, in display order
    pub fn visible(&self) -> impl Iterator<Item = &Candidate> {
        self.visible.iter().map(|&i| &self.candidates[i])
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn visible_at(&self, row: usize) -> Option<&Candidate> {
        self.visible.get(row).map(|&i| &self.candidates[i])
    }

    /// Whether the host should draw the candidate rows
    pub fn panel_visible(&self) -> bool {
        self.open && !self.visible.is_empty()
    }

    /// Typed text that matches nothing but can still be accepted with Enter
    pub fn custom_hint(&self) -> Option<&str> {
        let show = self.open
            && self.options.allow_custom
            && self.options.kind == FieldKind::Dropdown
            && !self.draft.is_empty()
            && self.visible.is_empty();
        show.then_some(self.draft.as_str())
    }

    /// Category groups over the visible rows (category sort only)
    pub fn groups(&self) -> Option<Vec<Group>> {
        (self.options.sort == SortMode::Category)
            .then(|| group_by_category(&self.candidates, &self.visible))
    }

    /// `aria-expanded`
    pub fn expanded(&self) -> bool {
        self.open
    }

    /// `aria-invalid`
    pub fn invalid(&self) -> bool {
        self.options.error.is_some()
    }

    pub fn close_pending(&self) -> bool {
        self.close_timer.is_pending()
    }

    /// Time until a blur-triggered close fires
    pub fn close_remaining(&self, now: Instant) -> Option<Duration> {
        self.close_timer.remaining(now)
    }

    // -----------------------------------------------------------------------
    // Filtering
    // -----------------------------------------------------------------------

    /// Whether the draft narrows the list. A dropdown only filters while the
    /// user is editing away from the settled value, so a freshly opened
    /// panel always lists every candidate. A suggestion box always filters.
    pub fn should_filter(&self) -> bool {
        match self.options.kind {
            FieldKind::Dropdown => {
                self.options.allow_custom && !self.draft.is_empty() && self.draft != self.settled
            }
            FieldKind::Suggest => true,
        }
    }

    fn recompute(&mut self) {
        self.visible = if self.options.kind == FieldKind::Suggest && self.draft.is_empty() {
            Vec::new()
        } else {
            let query = self.should_filter().then_some(self.draft.as_str());
            visible_indices(&self.candidates, self.options.sort, query)
        };
        self.highlighted = None;
        trace!(
            field = %self.options.id,
            visible = self.visible.len(),
            total = self.candidates.len(),
            "recomputed typeahead list"
        );
    }

    // -----------------------------------------------------------------------
    // Text entry
    // -----------------------------------------------------------------------

    /// Replace the draft with `text` (one keystroke's worth of change).
    pub fn set_draft(&mut self, text: impl Into<String>) -> Option<Notification> {
        let text = text.into();
        let cursor = text.len();
        self.apply_draft(text, cursor)
    }

    fn apply_draft(&mut self, text: String, cursor: usize) -> Option<Notification> {
        if self.options.disabled {
            return None;
        }
        if !self.options.allow_custom {
            // Read-only input: typing only reveals the list
            self.highlighted = None;
            self.open();
            return None;
        }
        if self
            .options
            .max_length
            .is_some_and(|max| text.chars().count() > max)
        {
            return None;
        }

        self.draft = text;
        self.cursor = cursor.min(self.draft.len());
        self.recompute();
        self.open();

        // Typing is committing when free text is allowed
        if self.committed != self.draft {
            self.committed = self.draft.clone();
            Some(Notification::ValueChanged(self.committed.clone()))
        } else {
            None
        }
    }

    pub fn insert_char(&mut self, c: char) -> Option<Notification> {
        let mut text = self.draft.clone();
        text.insert(self.cursor, c);
        let cursor = self.cursor + c.len_utf8();
        self.apply_draft(text, cursor)
    }

    pub fn backspace(&mut self) -> Option<Notification> {
        let start = prev_grapheme_boundary(&self.draft, self.cursor)?;
        let mut text = self.draft.clone();
        text.replace_range(start..self.cursor, "");
        self.apply_draft(text, start)
    }

    pub fn delete(&mut self) -> Option<Notification> {
        let end = next_grapheme_boundary(&self.draft, self.cursor)?;
        let mut text = self.draft.clone();
        text.replace_range(self.cursor..end, "");
        let cursor = self.cursor;
        self.apply_draft(text, cursor)
    }

    pub fn move_left(&mut self) {
        if let Some(pos) = prev_grapheme_boundary(&self.draft, self.cursor) {
            self.cursor = pos;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(pos) = next_grapheme_boundary(&self.draft, self.cursor) {
            self.cursor = pos;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.draft.len();
    }

    // -----------------------------------------------------------------------
    // Open / close
    // -----------------------------------------------------------------------

    /// Show the panel. Never narrows the list by the committed value.
    pub fn open(&mut self) {
        if self.options.disabled {
            return;
        }
        self.close_timer.cancel();
        if !self.open {
            self.open = true;
            debug!(field = %self.options.id, "typeahead opened");
        }
    }

    pub fn close(&mut self, reason: CloseReason, now: Instant) {
        match reason {
            CloseReason::Blur => {
                if self.open {
                    self.close_timer.schedule(now);
                }
            }
            CloseReason::Selection | CloseReason::OutsidePointer | CloseReason::Escape => {
                self.close_now(reason);
            }
        }
    }

    fn close_now(&mut self, reason: CloseReason) {
        self.close_timer.cancel();
        if self.open {
            self.open = false;
            debug!(field = %self.options.id, ?reason, "typeahead closed");
        }
        self.highlighted = None;
        // Whatever was typed has already been propagated; the editing
        // session ends here, so the next open lists everything again.
        if self.settled != self.draft {
            self.settled = self.draft.clone();
            self.recompute();
        }
    }

    /// Fire a due blur-close. Returns true if the panel closed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.close_timer.fire(now) {
            self.close_now(CloseReason::Blur);
            true
        } else {
            false
        }
    }

    pub fn focus(&mut self) {
        self.focused = true;
        self.close_timer.cancel();
        match self.options.kind {
            FieldKind::Dropdown => self.open(),
            FieldKind::Suggest => {
                if !self.visible.is_empty() {
                    self.open();
                }
            }
        }
    }

    pub fn blur(&mut self, now: Instant) {
        self.focused = false;
        self.close(CloseReason::Blur, now);
    }

    /// The arrow button next to the input
    pub fn toggle(&mut self) {
        if self.options.disabled {
            return;
        }
        if self.open {
            self.close_now(CloseReason::Selection);
        } else {
            self.focused = true;
            self.open();
        }
    }

    /// Escape or an outside pointer-down: hide the panel, keep all text.
    /// Returns false if there was nothing to dismiss.
    pub fn dismiss(&mut self) -> bool {
        if !self.open {
            return false;
        }
        self.close_now(CloseReason::Escape);
        true
    }

    /// Dismiss if a pointer-down at (x, y) lands outside both the input and
    /// the panel.
    pub fn pointer_down(&mut self, target: &OutsidePointer, x: u16, y: u16) -> bool {
        if !self.open || !target.is_outside(x, y) {
            return false;
        }
        self.close_now(CloseReason::OutsidePointer);
        true
    }

    // -----------------------------------------------------------------------
    // Navigation and selection
    // -----------------------------------------------------------------------

    /// Move the highlight one row. Returns true when the key was consumed
    /// (the host must then skip caret movement).
    pub fn navigate(&mut self, direction: Direction) -> bool {
        if !self.open || self.visible.is_empty() {
            return false;
        }
        let last = self.visible.len() - 1;
        self.highlighted = match (direction, self.highlighted) {
            (Direction::Down, None) => Some(0),
            (Direction::Down, Some(i)) => Some((i + 1).min(last)),
            (Direction::Up, None) | (Direction::Up, Some(0)) => None,
            (Direction::Up, Some(i)) => Some(i - 1),
        };
        true
    }

    /// Pointer moved over a visible row
    pub fn hover(&mut self, row: usize) {
        if self.open && row < self.visible.len() {
            self.highlighted = Some(row);
        }
    }

    /// Choose the visible row at `row`.
    pub fn select(&mut self, row: usize) -> Option<Notification> {
        if self.options.disabled {
            return None;
        }
        let value = self.visible_at(row)?.value.clone();
        self.commit_selection(value)
    }

    /// Choose a candidate directly (it need not be in the visible list).
    pub fn select_candidate(&mut self, candidate: &Candidate) -> Option<Notification> {
        if self.options.disabled {
            return None;
        }
        self.commit_selection(candidate.value.clone())
    }

    fn commit_selection(&mut self, value: String) -> Option<Notification> {
        debug!(field = %self.options.id, value = %value, "candidate selected");
        self.draft = value.clone();
        self.cursor = self.draft.len();
        self.close_now(CloseReason::Selection);
        self.settled = value.clone();
        self.recompute();
        // Focus returns to the input without reopening the panel
        self.focused = true;

        if self.committed != value {
            self.committed = value;
            Some(Notification::ValueChanged(self.committed.clone()))
        } else {
            None
        }
    }

    /// Enter key
    pub fn commit_highlighted(&mut self) -> Option<Notification> {
        if self.options.disabled {
            return None;
        }
        if let Some(row) = self.highlighted {
            return self.select(row);
        }
        if self.options.allow_custom {
            // Accept what was typed
            self.close_now(CloseReason::Selection);
            if self.committed != self.draft {
                self.committed = self.draft.clone();
                return Some(Notification::ValueChanged(self.committed.clone()));
            }
            return None;
        }
        Some(Notification::EnterWithNoMatch)
    }

    /// Collaborator-level clear action
    pub fn clear(&mut self) -> Option<Notification> {
        if self.options.disabled {
            return None;
        }
        self.draft.clear();
        self.committed.clear();
        self.settled.clear();
        self.cursor = 0;
        self.recompute();
        Some(Notification::Cleared)
    }

    // -----------------------------------------------------------------------
    // Collaborator updates
    // -----------------------------------------------------------------------

    /// The external value changed (e.g. a parent form reset). Our own
    /// propagated value coming back is ignored.
    pub fn sync_external(&mut self, value: &str) {
        if value == self.committed {
            return;
        }
        self.committed = value.to_string();
        self.draft = value.to_string();
        self.settled = value.to_string();
        self.cursor = self.draft.len();
        self.recompute();
    }

    pub fn set_candidates(&mut self, candidates: Vec<Candidate>) {
        self.candidates = candidates;
        self.recompute();
    }

    pub fn set_sort(&mut self, sort: SortMode) {
        if self.options.sort != sort {
            self.options.sort = sort;
            self.recompute();
        }
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.options.disabled = disabled;
        if disabled {
            self.close_now(CloseReason::Selection);
        }
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.options.error = error;
    }
}
