//! Result list: the options for the current settled query.
//!
//! Each option takes two lines: the name, then `alias • email`. `↑`/`↓` move
//! the highlight and `Enter` picks the highlighted person. The list only
//! ever shows what the controller exposes, so selected people never appear.

use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use ppl_core::{Person, PickerController, SearchPhase};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

const OPTION_HEIGHT: usize = 2;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct ResultListState {
    /// Index of the highlighted option.
    pub cursor: usize,
}

impl ResultListState {
    pub fn highlighted<'p>(&self, picker: &'p PickerController) -> Option<&'p Person> {
        picker.results().get(self.cursor)
    }

    /// Handle a key event while the list is focused.
    ///
    /// Returns `false` for events it does not consume, including `Nav(Up)`
    /// on the first option so the shell can hand focus back to the search
    /// box.
    pub fn handle(&mut self, picker: &mut PickerController, event: &AppEvent) -> bool {
        let len = picker.results().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));

        match event {
            AppEvent::Nav(Direction::Up) => {
                if self.cursor == 0 {
                    return false;
                }
                self.cursor -= 1;
                true
            }
            AppEvent::Nav(Direction::Down) => {
                if self.cursor + 1 < len {
                    self.cursor += 1;
                }
                true
            }
            AppEvent::Enter => {
                let Some(person) = self.highlighted(picker).cloned() else {
                    return false;
                };
                tracing::debug!(email = %person.email, "results: pick");
                picker.pick(person);
                self.cursor = 0;
                true
            }
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct ResultList<'a> {
    picker: &'a PickerController,
    state: &'a ResultListState,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> ResultList<'a> {
    pub fn new(
        picker: &'a PickerController,
        state: &'a ResultListState,
        focused: bool,
        theme: &'a Theme,
    ) -> Self {
        Self {
            picker,
            state,
            focused,
            theme,
        }
    }

    /// Hint shown in place of options when there are none.
    fn empty_hint(&self) -> String {
        if !self.picker.has_search() {
            return "search is not available".to_string();
        }
        if self.picker.is_loading() {
            return "searching…".to_string();
        }
        match self.picker.phase() {
            SearchPhase::Settled | SearchPhase::Failed => "no matches".to_string(),
            SearchPhase::Idle | SearchPhase::Searching => {
                let min = self.picker.options().min_search_length.max(1);
                format!("type at least {min} character{}", if min == 1 { "" } else { "s" })
            }
        }
    }
}

impl Widget for ResultList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            self.theme.border_focused
        } else {
            self.theme.border_unfocused
        };
        let block = Block::bordered().title("Results").border_style(border_style);
        let inner = block.inner(area);
        block.render(area, buf);

        let results = self.picker.results();
        if results.is_empty() {
            Paragraph::new(Span::styled(self.empty_hint(), self.theme.hint)).render(inner, buf);
            return;
        }

        let per_page = (inner.height as usize / OPTION_HEIGHT).max(1);
        let cursor = self.state.cursor.min(results.len() - 1);
        let start = (cursor + 1).saturating_sub(per_page);

        let mut lines: Vec<Line> = Vec::with_capacity(per_page * OPTION_HEIGHT);
        for (i, person) in results.iter().enumerate().skip(start).take(per_page) {
            let highlight = self.focused && i == cursor;
            let mut name = self.theme.option_name;
            let mut detail = self.theme.option_detail;
            if highlight {
                name = name.patch(self.theme.option_highlight);
                detail = detail.patch(self.theme.option_highlight);
            }
            let marker = if highlight { "› " } else { "  " };
            lines.push(Line::from(vec![
                Span::styled(marker, name),
                Span::styled(person.name.as_str(), name),
            ]));
            lines.push(Line::from(Span::styled(format!("  {}", person.detail()), detail)));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
