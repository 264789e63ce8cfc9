//! Top-level application state and the main event loop.
//!
//! [`App::run`] sets up the terminal, drives the crossterm event loop, and
//! tears everything down cleanly on exit or panic. The picker controller is
//! polled once per frame so settled queries and finished searches show up
//! without waiting for a keypress.

use crate::{
    commands::execute_command,
    event::{self, AppEvent, Direction},
    theme::Theme,
    widgets::{
        chip_row::{ChipRow, ChipRowState},
        command_bar::{CommandBar, CommandBarOutcome, CommandBarState},
        help::HelpPopup,
        result_list::{ResultList, ResultListState},
        search_box::{SearchBox, SearchBoxState},
    },
};
use crossterm::{
    event::{self as ct_event, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ppl_core::{config::UiConfig, Person, PickerController};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction as LayoutDir, Layout, Rect},
    text::Span,
    widgets::Paragraph,
    Frame, Terminal,
};
use std::{io, time::Duration};

// ---------------------------------------------------------------------------
// Focus + outcome types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Typing into the search box.
    Input,
    Results,
    Chips,
    /// Vim-style `:` command line is active.
    Command,
}

/// How the session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Submitted with a valid selection.
    Submitted(Vec<Person>),
    Cancelled,
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub picker: PickerController,
    pub search_box: SearchBoxState,
    pub results: ResultListState,
    pub chips: ChipRowState,
    pub focus: Focus,
    /// Focus state before entering command mode, restored on exit.
    pub prev_focus: Focus,
    pub theme: Theme,
    pub ui: UiConfig,
    pub show_help: bool,
    pub command_bar: CommandBarState,
    /// Set once the session is over.
    pub outcome: Option<Outcome>,
    /// Frame counter driving the spinner.
    pub tick: usize,
}

impl AppState {
    pub fn new(picker: PickerController, ui: UiConfig, theme: Theme) -> Self {
        Self {
            picker,
            search_box: SearchBoxState::default(),
            results: ResultListState::default(),
            chips: ChipRowState::default(),
            focus: Focus::Input,
            prev_focus: Focus::Input,
            theme,
            ui,
            show_help: false,
            command_bar: CommandBarState::default(),
            outcome: None,
            tick: 0,
        }
    }

    /// Mark the submit attempt and finish when validation passes.
    pub fn submit(&mut self) {
        self.picker.set_submit_attempted(true);
        if self.picker.validation_error() {
            tracing::debug!("submit rejected: selection required");
            return;
        }
        tracing::info!(selected = self.picker.selection().len(), "submitted");
        self.outcome = Some(Outcome::Submitted(self.picker.selection().to_vec()));
    }

    pub fn cancel(&mut self) {
        tracing::debug!("cancelled");
        self.outcome = Some(Outcome::Cancelled);
    }

    pub fn is_done(&self) -> bool {
        self.outcome.is_some()
    }

    fn set_focus(&mut self, next: Focus) {
        if next != self.focus {
            tracing::debug!(from = ?self.focus, to = ?next, "focus");
        }
        if next == Focus::Chips {
            self.chips.focus_last(self.picker.selection());
        }
        if next == Focus::Results {
            self.results.cursor = 0;
        }
        self.focus = next;
    }

    /// Route one application event.
    pub fn handle(&mut self, event: AppEvent) {
        // Help popup intercepts all events; only close keys pass through.
        if self.show_help {
            if matches!(event, AppEvent::Char('?') | AppEvent::Escape | AppEvent::Quit) {
                tracing::debug!("help popup closed");
                self.show_help = false;
            }
            return;
        }

        // Command mode intercepts all events.
        if self.focus == Focus::Command {
            match self.command_bar.handle(&event) {
                CommandBarOutcome::Open => {}
                CommandBarOutcome::Closed => self.focus = self.prev_focus,
                CommandBarOutcome::Run(cmd) => {
                    tracing::debug!(command = ?cmd, "executing command");
                    self.focus = self.prev_focus;
                    execute_command(self, cmd);
                }
            }
            return;
        }

        match event {
            AppEvent::Quit => self.cancel(),
            AppEvent::Submit => self.submit(),

            AppEvent::Char('?') if self.focus != Focus::Input => {
                tracing::debug!("help popup opened");
                self.show_help = true;
            }
            AppEvent::Char(':') if self.focus != Focus::Input => {
                tracing::debug!(prev_focus = ?self.focus, "entering command mode");
                self.prev_focus = self.focus;
                self.command_bar.clear();
                self.focus = Focus::Command;
            }

            AppEvent::FocusInput => self.set_focus(Focus::Input),
            AppEvent::Escape if self.focus == Focus::Input => self.set_focus(Focus::Results),
            AppEvent::Escape => {}

            // Tab-cycle focus: Input → Results → Chips → Input
            AppEvent::FocusNext => {
                let next = match self.focus {
                    Focus::Input => Focus::Results,
                    Focus::Results => Focus::Chips,
                    Focus::Chips | Focus::Command => Focus::Input,
                };
                self.set_focus(next);
            }
            AppEvent::FocusPrev => {
                let next = match self.focus {
                    Focus::Input => Focus::Chips,
                    Focus::Results => Focus::Input,
                    Focus::Chips | Focus::Command => Focus::Results,
                };
                self.set_focus(next);
            }

            // Terminal resize is handled automatically by ratatui
            AppEvent::Resize(_, _) | AppEvent::NoOp => {}

            other => self.dispatch_to_focused(other),
        }
    }

    /// Hand an event to the focused widget; unconsumed events move focus.
    fn dispatch_to_focused(&mut self, event: AppEvent) {
        match self.focus {
            Focus::Input => {
                if self.search_box.handle(&mut self.picker, &event) {
                    return;
                }
                match event {
                    AppEvent::Nav(Direction::Down) if !self.picker.results().is_empty() => {
                        self.set_focus(Focus::Results)
                    }
                    AppEvent::Backspace if !self.picker.selection().is_empty() => {
                        self.set_focus(Focus::Chips)
                    }
                    _ => {}
                }
            }
            Focus::Results => {
                let picking = event == AppEvent::Enter;
                if self.results.handle(&mut self.picker, &event) {
                    if picking {
                        self.search_box.sync(self.picker.raw_query());
                        self.set_focus(Focus::Input);
                    }
                    return;
                }
                if event == AppEvent::Nav(Direction::Up) {
                    self.set_focus(Focus::Input);
                }
            }
            Focus::Chips => {
                self.chips.handle(&mut self.picker, &event);
                if self.picker.selection().is_empty() {
                    self.set_focus(Focus::Input);
                }
            }
            Focus::Command => {} // handled before dispatch, should not reach here
        }
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    state: AppState,
}

impl App {
    pub fn new(picker: PickerController, ui: UiConfig, theme: Theme) -> Self {
        App {
            state: AppState::new(picker, ui, theme),
        }
    }

    /// Set up the terminal, run the event loop, and restore the terminal on exit.
    ///
    /// Must be called inside a tokio runtime context so the picker can spawn
    /// its searches.
    pub fn run(mut self) -> anyhow::Result<Outcome> {
        install_panic_hook();

        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        // Always restore terminal, even if the loop returned an error
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        result?;
        Ok(self.state.outcome.unwrap_or(Outcome::Cancelled))
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        loop {
            self.state.picker.poll();
            self.state.tick = self.state.tick.wrapping_add(1);
            {
                let s = &self.state;
                terminal.draw(|frame| draw(frame, s))?;
            }

            if self.state.is_done() {
                break;
            }

            if ct_event::poll(Duration::from_millis(16))? {
                match ct_event::read()? {
                    Event::Key(key) if key.kind == crossterm::event::KeyEventKind::Press => {
                        let raw = Event::Key(key);
                        // Use insert-mode mapping when a text widget is focused
                        let app_event = if is_insert_mode(self.state.focus) {
                            event::to_app_event_insert(raw)
                        } else {
                            event::to_app_event(raw)
                        };
                        if let Some(ev) = app_event {
                            tracing::trace!(focus = ?self.state.focus, event = ?ev, "key event");
                            self.state.handle(ev);
                        }
                    }
                    other => {
                        if let Some(ev) = event::to_app_event(other) {
                            self.state.handle(ev);
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// Returns true when the current focus is on a text-input widget, meaning
/// alphabetic keys should produce characters rather than trigger shortcuts.
fn is_insert_mode(focus: Focus) -> bool {
    matches!(focus, Focus::Input | Focus::Command)
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Centre a column no wider than `max_width`.
fn picker_column(area: Rect, max_width: u16) -> Rect {
    let width = area.width.min(max_width.max(20));
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

/// The line under the search box: the validation error, or the email of
/// whatever is focused.
fn detail_line(state: &AppState) -> Span<'_> {
    if let Some(msg) = state.picker.error_message() {
        return Span::styled(msg, state.theme.error);
    }
    let focused = match state.focus {
        Focus::Chips => state.chips.focused(&state.picker),
        Focus::Results => state.results.highlighted(&state.picker),
        _ => None,
    };
    match focused {
        Some(person) => Span::styled(person.email.as_str(), state.theme.detail),
        None => Span::styled("? help  ·  Ctrl+s submit  ·  Ctrl+c quit", state.theme.hint),
    }
}

pub fn draw(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    let column = picker_column(area, state.ui.max_width);
    let chip_height = ChipRow::height(state.picker.selection(), column.width);

    // Vertical: chips | search box | detail line | results | command row
    let vert = Layout::default()
        .direction(LayoutDir::Vertical)
        .constraints([
            Constraint::Length(chip_height),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .split(column);

    frame.render_widget(
        ChipRow::new(
            state.picker.selection(),
            &state.chips,
            state.focus == Focus::Chips,
            &state.theme,
        ),
        vert[0],
    );
    let search = SearchBox::new(
        &state.picker,
        &state.search_box,
        state.focus == Focus::Input,
        &state.theme,
    )
    .placeholder(&state.ui.placeholder)
    .tick(state.tick);
    let cursor = search.cursor_position(vert[1]);
    frame.render_widget(search, vert[1]);
    frame.render_widget(Paragraph::new(detail_line(state)), vert[2]);
    frame.render_widget(
        ResultList::new(
            &state.picker,
            &state.results,
            state.focus == Focus::Results,
            &state.theme,
        ),
        vert[3],
    );

    if state.show_help {
        frame.render_widget(HelpPopup::new(&state.theme), area);
    }

    // Command bar overlays the bottom row of the screen
    if state.focus == Focus::Command {
        let cmd_area = Rect {
            y: area.bottom().saturating_sub(1),
            height: 1,
            ..area
        };
        frame.render_widget(CommandBar::new(&state.command_bar, &state.theme), cmd_area);
        let col = state.command_bar.cursor_col(cmd_area);
        frame.set_cursor_position((col, cmd_area.y));
        return;
    }

    if state.focus == Focus::Input {
        frame.set_cursor_position(cursor);
    }
}

// ---------------------------------------------------------------------------
// Terminal helpers
// ---------------------------------------------------------------------------

fn install_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original(info);
    }));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
