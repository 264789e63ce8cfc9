//! Configuration types for ppl.
//!
//! [`Config::load`] reads `~/.config/ppl/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist. [`Config::defaults`] returns
//! the same defaults without touching the filesystem (useful in tests).

use crate::controller::{PickerOptions, StalePolicy};
use serde::Deserialize;
use std::{path::PathBuf, time::Duration};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[picker]
min_search_length      = 3
debounce_delay_ms      = 300
is_required            = false
required_error_message = "Required field"
stale_results          = "latest"

[ui]
placeholder = "Search user by name/email/alias"
max_width   = 80
theme       = "default"

[directory]
latency_ms = 300
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration, loaded from `~/.config/ppl/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub picker: PickerConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub directory: DirectoryConfig,
}

/// `[picker]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct PickerConfig {
    #[serde(default = "default_min_search_length")]
    pub min_search_length: usize,
    #[serde(default = "default_debounce_delay_ms")]
    pub debounce_delay_ms: u64,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default = "default_required_error_message")]
    pub required_error_message: String,
    /// `"latest"` or `"arrival"`.
    #[serde(default = "default_stale_results")]
    pub stale_results: String,
}

fn default_min_search_length() -> usize { 3 }
fn default_debounce_delay_ms() -> u64 { 300 }
fn default_required_error_message() -> String { "Required field".to_string() }
fn default_stale_results() -> String { "latest".to_string() }

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            min_search_length: default_min_search_length(),
            debounce_delay_ms: default_debounce_delay_ms(),
            is_required: false,
            required_error_message: default_required_error_message(),
            stale_results: default_stale_results(),
        }
    }
}

impl PickerConfig {
    /// Controller options described by this section. Unknown
    /// `stale_results` values fall back to latest-wins.
    pub fn to_options(&self) -> PickerOptions {
        let stale_policy = match self.stale_results.to_ascii_lowercase().as_str() {
            "arrival" | "completion" | "completion_order" => StalePolicy::CompletionOrder,
            _ => StalePolicy::LatestWins,
        };
        PickerOptions {
            min_search_length: self.min_search_length,
            debounce_delay: Duration::from_millis(self.debounce_delay_ms),
            is_required: self.is_required,
            required_error_message: self.required_error_message.clone(),
            stale_policy,
        }
    }
}

/// `[ui]` section of `config.toml`. Presentation only; the controller never
/// reads it.
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
    /// Widest the picker may grow, in terminal columns.
    #[serde(default = "default_max_width")]
    pub max_width: u16,
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Search box border colour override.
    #[serde(default)]
    pub border_color: Option<String>,
    /// Chip background colour override.
    #[serde(default)]
    pub chip_color: Option<String>,
    /// Detail bar colour override.
    #[serde(default)]
    pub detail_color: Option<String>,
}

fn default_placeholder() -> String { "Search user by name/email/alias".to_string() }
fn default_max_width() -> u16 { 80 }
fn default_theme() -> String { "default".to_string() }

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            placeholder: default_placeholder(),
            max_width: default_max_width(),
            theme: default_theme(),
            border_color: None,
            chip_color: None,
            detail_color: None,
        }
    }
}

/// `[directory]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryConfig {
    /// JSON file with an array of people. The built-in demo roster is used
    /// when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Simulated backend latency for the in-memory directory.
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,
}

fn default_latency_ms() -> u64 { 300 }

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            path: None,
            latency_ms: default_latency_ms(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/ppl/config.toml`, layered on top of the built-in
    /// defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&config_path())
    }

    /// Same as [`Config::load`] for an explicit path.
    pub fn load_from(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, DEFAULT_CONFIG.trim_start())?;
        }

        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path).required(false))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("ppl")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
