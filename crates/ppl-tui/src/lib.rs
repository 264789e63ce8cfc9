//! ppl TUI: ratatui shell around a [`ppl_core::PickerController`].

pub mod app;
pub mod commands;
pub mod event;
pub mod theme;
pub mod widgets;

pub use app::{App, Outcome};

use ppl_core::{config::UiConfig, PickerController};

/// Run the picker full-screen until the user submits or quits.
///
/// Must be called from inside a tokio runtime context.
pub fn run(picker: PickerController, ui: UiConfig) -> anyhow::Result<Outcome> {
    let theme = theme::Theme::by_name(&ui.theme).with_overrides(&ui);
    App::new(picker, ui, theme).run()
}
