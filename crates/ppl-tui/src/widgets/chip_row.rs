//! Chip row: the selected people, one chip each, in selection order.
//!
//! Chips wrap onto as many lines as they need; [`ChipRow::height`] tells the
//! layout how tall the block must be. While the row is focused, `←`/`→` move
//! between chips and `Backspace`/`Delete` remove the focused one.

use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use ppl_core::{Person, PickerController, Selection};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct ChipRowState {
    /// Index of the focused chip.
    pub cursor: usize,
}

impl ChipRowState {
    pub fn focus_last(&mut self, selection: &Selection) {
        self.cursor = selection.len().saturating_sub(1);
    }

    pub fn focused<'p>(&self, picker: &'p PickerController) -> Option<&'p Person> {
        picker.selection().as_slice().get(self.cursor)
    }

    /// Handle a key event while the chip row is focused. Returns `false` for
    /// events it does not consume.
    pub fn handle(&mut self, picker: &mut PickerController, event: &AppEvent) -> bool {
        let len = picker.selection().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));

        match event {
            AppEvent::Nav(Direction::Left) => {
                self.cursor = self.cursor.saturating_sub(1);
                true
            }
            AppEvent::Nav(Direction::Right) => {
                if self.cursor + 1 < len {
                    self.cursor += 1;
                }
                true
            }
            AppEvent::Backspace | AppEvent::Delete => {
                let Some(email) = self.focused(picker).map(|p| p.email.clone()) else {
                    return false;
                };
                tracing::debug!(email = %email, "chips: delete");
                picker.remove(&email);
                self.cursor = self.cursor.min(picker.selection().len().saturating_sub(1));
                true
            }
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct ChipRow<'a> {
    selection: &'a Selection,
    state: &'a ChipRowState,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> ChipRow<'a> {
    pub fn new(
        selection: &'a Selection,
        state: &'a ChipRowState,
        focused: bool,
        theme: &'a Theme,
    ) -> Self {
        Self {
            selection,
            state,
            focused,
            theme,
        }
    }

    /// Block height (borders included) needed to show every chip in `width`
    /// columns.
    pub fn height(selection: &Selection, width: u16) -> u16 {
        let lines = pack(selection, width.saturating_sub(2)).len().max(1);
        lines as u16 + 2
    }
}

fn chip_label(person: &Person) -> String {
    format!(" {} ✕ ", person.name)
}

/// Greedily pack chip indices into lines no wider than `width`.
fn pack(selection: &Selection, width: u16) -> Vec<Vec<usize>> {
    let width = width.max(1) as usize;
    let mut lines: Vec<Vec<usize>> = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    let mut used = 0usize;

    for (i, person) in selection.iter().enumerate() {
        let w = chip_label(person).chars().count();
        let needed = if current.is_empty() { w } else { w + 1 };
        if !current.is_empty() && used + needed > width {
            lines.push(std::mem::take(&mut current));
            used = 0;
        }
        used += if current.is_empty() { w } else { w + 1 };
        current.push(i);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

impl Widget for ChipRow<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            self.theme.border_focused
        } else {
            self.theme.border_unfocused
        };
        let block = Block::bordered()
            .title(format!("Selected ({})", self.selection.len()))
            .border_style(border_style);
        let inner = block.inner(area);
        block.render(area, buf);

        if self.selection.is_empty() {
            Paragraph::new(Span::styled("nobody selected", self.theme.hint)).render(inner, buf);
            return;
        }

        let people = self.selection.as_slice();
        let lines: Vec<Line> = pack(self.selection, inner.width)
            .into_iter()
            .map(|indices| {
                let mut spans = Vec::new();
                for (n, i) in indices.into_iter().enumerate() {
                    if n > 0 {
                        spans.push(Span::raw(" "));
                    }
                    let style = if self.focused && i == self.state.cursor {
                        self.theme.chip_focused
                    } else {
                        self.theme.chip
                    };
                    spans.push(Span::styled(chip_label(&people[i]), style));
                }
                Line::from(spans)
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
