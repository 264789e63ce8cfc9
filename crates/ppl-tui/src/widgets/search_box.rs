//! Search box widget: the text input the user types queries into.
//!
//! # Editing
//!
//! - `Char(c)` inserts at the cursor.
//! - `Backspace` deletes the character before the cursor.
//! - `Delete` deletes the character under the cursor.
//! - `Nav(Left)` / `Nav(Right)` move the cursor.
//!
//! The text itself lives in the [`PickerController`]; this state only keeps
//! the cursor. Every edit hands the full next text to
//! [`PickerController::set_query`].

use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use ppl_core::PickerController;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction as LayoutDir, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct SearchBoxState {
    /// Byte offset of the cursor within the controller's raw query.
    pub cursor: usize,
}

impl SearchBoxState {
    /// Clamp the cursor after the controller changed the text underneath us
    /// (a pick clears it).
    pub fn sync(&mut self, query: &str) {
        if self.cursor > query.len() || !query.is_char_boundary(self.cursor) {
            self.cursor = query.len();
        }
    }

    /// Handle a key event from the app shell.
    ///
    /// Returns `false` for events the search box does not consume, so the
    /// shell can use them for focus changes (`Backspace` on an empty query,
    /// `Nav(Down)`).
    pub fn handle(&mut self, picker: &mut PickerController, event: &AppEvent) -> bool {
        self.sync(picker.raw_query());
        let mut query = picker.raw_query().to_string();

        match event {
            AppEvent::Char(c) => {
                query.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                tracing::debug!(query = %query, cursor = self.cursor, "search: char inserted");
                picker.set_query(query);
                true
            }
            AppEvent::Backspace => {
                if self.cursor == 0 {
                    return !query.is_empty();
                }
                // Walk back one char boundary
                let prev = query[..self.cursor]
                    .char_indices()
                    .last()
                    .map(|(i, _)| i)
                    .unwrap_or(0);
                query.remove(prev);
                self.cursor = prev;
                tracing::debug!(query = %query, cursor = self.cursor, "search: backspace");
                picker.set_query(query);
                true
            }
            AppEvent::Delete => {
                if self.cursor < query.len() {
                    query.remove(self.cursor);
                    picker.set_query(query);
                }
                true
            }
            AppEvent::Nav(Direction::Left) => {
                if self.cursor > 0 {
                    self.cursor = query[..self.cursor]
                        .char_indices()
                        .last()
                        .map(|(i, _)| i)
                        .unwrap_or(0);
                }
                true
            }
            AppEvent::Nav(Direction::Right) => {
                if self.cursor < query.len() {
                    self.cursor = query[self.cursor..]
                        .char_indices()
                        .nth(1)
                        .map(|(i, _)| self.cursor + i)
                        .unwrap_or(query.len());
                }
                true
            }
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct SearchBox<'a> {
    picker: &'a PickerController,
    state: &'a SearchBoxState,
    focused: bool,
    placeholder: &'a str,
    tick: usize,
    theme: &'a Theme,
}

impl<'a> SearchBox<'a> {
    pub fn new(
        picker: &'a PickerController,
        state: &'a SearchBoxState,
        focused: bool,
        theme: &'a Theme,
    ) -> Self {
        Self {
            picker,
            state,
            focused,
            placeholder: "Search user by name/email/alias",
            tick: 0,
            theme,
        }
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Animation frame for the loading spinner.
    pub fn tick(mut self, tick: usize) -> Self {
        self.tick = tick;
        self
    }

    /// Absolute terminal position of the text cursor within this widget's
    /// rendered area. Pass to `frame.set_cursor_position()` after rendering.
    pub fn cursor_position(&self, area: Rect) -> (u16, u16) {
        let query = self.picker.raw_query();
        let cursor = self.state.cursor.min(query.len());
        let col = query.get(..cursor).map(|s| s.chars().count()).unwrap_or(0) as u16;
        let x = (area.x + 1 + col).min(area.right().saturating_sub(1));
        let y = area.y + 1;
        (x, y)
    }
}

impl Widget for SearchBox<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.picker.validation_error() {
            self.theme.error
        } else if self.focused {
            self.theme.border_focused
        } else {
            self.theme.border_unfocused
        };

        let title = if self.picker.options().is_required {
            "Search *"
        } else {
            "Search"
        };
        let block = Block::bordered().title(title).border_style(border_style);

        let inner = block.inner(area);
        block.render(area, buf);

        // Split inner area: query text (fill) | spinner (fixed width)
        let chunks = Layout::default()
            .direction(LayoutDir::Horizontal)
            .constraints([Constraint::Fill(1), Constraint::Length(2)])
            .split(inner);

        let query = self.picker.raw_query();
        let line = if query.is_empty() {
            Line::from(Span::styled(self.placeholder, self.theme.placeholder))
        } else {
            Line::from(query)
        };
        Paragraph::new(line).render(chunks[0], buf);

        if self.picker.is_loading() {
            let frame = SPINNER[self.tick % SPINNER.len()];
            Paragraph::new(Span::styled(frame, self.theme.spinner)).render(chunks[1], buf);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
