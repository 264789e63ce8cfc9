//! ppl: a debounced people picker for the terminal.
//!
//! The binary wires three crates together:
//!
//! ```text
//! ppl-directory ──► ppl-core (PickerController) ──► ppl-tui
//!   (search)          (debounce, selection)          (ratatui)
//! ```
//!
//! This crate owns the command line and the step that turns CLI flags plus
//! `config.toml` into a ready [`PickerController`]. It is a library so the
//! integration harnesses can build pickers exactly the way the binary does.

use anyhow::Context;
use clap::Parser;
use ppl_core::{config::Config, Person, PickerController, PickerOptions};
use ppl_directory::{demo_roster, InMemoryDirectory};
use std::{path::PathBuf, sync::Arc, time::Duration};

#[derive(Debug, Parser)]
#[command(name = "ppl", about = "Pick people from a directory, print them as JSON")]
pub struct Cli {
    /// Write debug logs to /tmp/ppl-debug.log (tail -f to inspect).
    #[arg(long)]
    pub debug: bool,

    /// Config file to use instead of ~/.config/ppl/config.toml.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// JSON file with an array of people. Defaults to the demo roster.
    #[arg(long)]
    pub directory: Option<PathBuf>,

    /// Shortest trimmed query that triggers a search.
    #[arg(long)]
    pub min_search_length: Option<usize>,

    /// Quiet period after the last keystroke before searching.
    #[arg(long)]
    pub debounce_ms: Option<u64>,

    /// Simulated directory latency.
    #[arg(long)]
    pub latency_ms: Option<u64>,

    /// Refuse to submit an empty selection.
    #[arg(long)]
    pub required: bool,

    /// Message shown when submitting an empty required selection.
    #[arg(long)]
    pub required_message: Option<String>,

    /// Pre-select the person with this email. Repeatable.
    #[arg(long = "select", value_name = "EMAIL")]
    pub select: Vec<String>,

    /// Theme name (`default`, `gruvbox`).
    #[arg(long)]
    pub theme: Option<String>,
}

impl Cli {
    /// Load the config file named by `--config`, or the default one, then
    /// layer the CLI flags on top.
    pub fn resolve_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => Config::load().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "config unreadable, using defaults");
                Config::defaults()
            }),
        };
        self.apply(&mut config);
        Ok(config)
    }

    /// CLI flags override file values.
    pub fn apply(&self, config: &mut Config) {
        if let Some(n) = self.min_search_length {
            config.picker.min_search_length = n;
        }
        if let Some(ms) = self.debounce_ms {
            config.picker.debounce_delay_ms = ms;
        }
        if self.required {
            config.picker.is_required = true;
        }
        if let Some(msg) = &self.required_message {
            config.picker.required_error_message = msg.clone();
        }
        if let Some(path) = &self.directory {
            config.directory.path = Some(path.clone());
        }
        if let Some(ms) = self.latency_ms {
            config.directory.latency_ms = ms;
        }
        if let Some(theme) = &self.theme {
            config.ui.theme = theme.clone();
        }
    }
}

/// Open the directory the config points at.
pub fn open_directory(config: &Config) -> anyhow::Result<InMemoryDirectory> {
    let directory = match &config.directory.path {
        Some(path) => InMemoryDirectory::from_json_file(path)?,
        None => InMemoryDirectory::new(demo_roster()),
    };
    tracing::info!(people = directory.len(), "directory opened");
    Ok(directory.with_latency(Duration::from_millis(config.directory.latency_ms)))
}

/// Look up every email in the directory, in order.
pub fn resolve_selection(
    directory: &InMemoryDirectory,
    emails: &[String],
) -> anyhow::Result<Vec<Person>> {
    emails
        .iter()
        .map(|email| {
            directory
                .find_by_email(email)
                .cloned()
                .with_context(|| format!("--select {email}: not in the directory"))
        })
        .collect()
}

/// Build the picker the binary runs: options from `config`, search backed
/// by `directory`, initial selection from `selected`.
pub fn build_picker(
    options: PickerOptions,
    directory: InMemoryDirectory,
    selected: Vec<Person>,
) -> PickerController {
    PickerController::builder()
        .options(options)
        .shared_search(Arc::new(directory))
        .initial_selection(selected)
        .on_selection_change(|people| {
            tracing::debug!(selected = people.len(), "selection changed");
        })
        .build()
}
