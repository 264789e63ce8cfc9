//! Colour theme for the ppl TUI.
//!
//! Themes are defined as TOML files. The built-in themes are embedded in the
//! binary via [`include_str!`] so the application works without any files on
//! disk. Resolve one with [`Theme::by_name`], apply the `[ui]` colour
//! overrides with [`Theme::with_overrides`], and pass the result through the
//! application as a shared reference. Nothing below the TUI ever looks a
//! theme up.

use config::{Config, File, FileFormat};
use ppl_core::config::UiConfig;
use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

const DEFAULT_THEME_SRC: &str = include_str!("themes/default.toml");
const GRUVBOX_DARK_THEME_SRC: &str = include_str!("themes/gruvbox_dark.toml");

// ---------------------------------------------------------------------------
// Raw (serde) types mirroring the TOML structure
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawStyle {
    fg: Option<String>,
    bg: Option<String>,
    #[serde(default)]
    bold: bool,
    #[serde(default)]
    dim: bool,
    #[serde(default)]
    italic: bool,
    #[serde(default)]
    underlined: bool,
}

impl RawStyle {
    fn into_style(self) -> Style {
        let mut style = Style::default();
        if let Some(c) = self.fg.as_deref().and_then(parse_color) {
            style = style.fg(c);
        }
        if let Some(c) = self.bg.as_deref().and_then(parse_color) {
            style = style.bg(c);
        }
        if self.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.dim {
            style = style.add_modifier(Modifier::DIM);
        }
        if self.italic {
            style = style.add_modifier(Modifier::ITALIC);
        }
        if self.underlined {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        style
    }
}

#[derive(Debug, Deserialize)]
struct RawBorders {
    focused: RawStyle,
    unfocused: RawStyle,
    command_bar: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawChips {
    normal: RawStyle,
    focused: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawOptions {
    name: RawStyle,
    detail: RawStyle,
    highlight: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawStatus {
    error: RawStyle,
    detail: RawStyle,
    spinner: RawStyle,
    placeholder: RawStyle,
    hint: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawTheme {
    borders: RawBorders,
    chips: RawChips,
    options: RawOptions,
    status: RawStatus,
}

// ---------------------------------------------------------------------------
// Public Theme type
// ---------------------------------------------------------------------------

/// Application colour theme. All styles are pre-resolved ratatui [`Style`]
/// values, so nothing is parsed at render time.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Border style for the currently focused pane.
    pub border_focused: Style,
    /// Border style for unfocused panes.
    pub border_unfocused: Style,
    pub border_command_bar: Style,

    /// Selected-person chips.
    pub chip: Style,
    pub chip_focused: Style,

    /// Result list: name line, `alias • email` line, highlighted row.
    pub option_name: Style,
    pub option_detail: Style,
    pub option_highlight: Style,

    /// Required-field error border and helper text.
    pub error: Style,
    /// Detail bar under the picker (email of the focused chip or option).
    pub detail: Style,
    pub spinner: Style,
    pub placeholder: Style,
    pub hint: Style,
}

impl Theme {
    /// Load and parse the embedded default theme.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed, which the tests below rule
    /// out.
    pub fn load_default() -> Self {
        Self::from_toml_str(DEFAULT_THEME_SRC).expect("embedded default theme must be valid TOML")
    }

    /// Load and parse the embedded Gruvbox Dark theme.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed.
    pub fn load_gruvbox_dark() -> Self {
        Self::from_toml_str(GRUVBOX_DARK_THEME_SRC)
            .expect("embedded gruvbox dark theme must be valid TOML")
    }

    /// Resolve a built-in theme by name. Unknown names get the default theme.
    pub fn by_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "gruvbox" | "gruvbox_dark" | "gruvbox-dark" => Self::load_gruvbox_dark(),
            _ => Self::load_default(),
        }
    }

    /// Parse a theme from a TOML string.
    pub fn from_toml_str(src: &str) -> anyhow::Result<Self> {
        let raw: RawTheme = Config::builder()
            .add_source(File::from_str(src, FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        Ok(Self {
            border_focused: raw.borders.focused.into_style(),
            border_unfocused: raw.borders.unfocused.into_style(),
            border_command_bar: raw.borders.command_bar.into_style(),
            chip: raw.chips.normal.into_style(),
            chip_focused: raw.chips.focused.into_style(),
            option_name: raw.options.name.into_style(),
            option_detail: raw.options.detail.into_style(),
            option_highlight: raw.options.highlight.into_style(),
            error: raw.status.error.into_style(),
            detail: raw.status.detail.into_style(),
            spinner: raw.status.spinner.into_style(),
            placeholder: raw.status.placeholder.into_style(),
            hint: raw.status.hint.into_style(),
        })
    }

    /// Apply the `[ui]` colour overrides. Unparseable colours are ignored.
    pub fn with_overrides(mut self, ui: &UiConfig) -> Self {
        if let Some(c) = ui.border_color.as_deref().and_then(parse_color) {
            self.border_focused = self.border_focused.fg(c);
        }
        if let Some(c) = ui.chip_color.as_deref().and_then(parse_color) {
            self.chip = self.chip.bg(c);
        }
        if let Some(c) = ui.detail_color.as_deref().and_then(parse_color) {
            self.detail = self.detail.fg(c);
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a colour name into a ratatui [`Color`].
///
/// Accepts:
/// - Named terminal colours (case-insensitive): `red`, `dark_gray`, `dimgray`, etc.
/// - Hex RGB: `#rrggbb`
/// - 256-colour indexed: `indexed:N`
pub fn parse_color(s: &str) -> Option<Color> {
    match s.to_ascii_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "gray" | "grey" => Some(Color::Gray),
        "dark_gray" | "darkgray" | "dark_grey" | "darkgrey" | "dimgray" | "dimgrey" => {
            Some(Color::DarkGray)
        }
        "light_red" => Some(Color::LightRed),
        "light_green" => Some(Color::LightGreen),
        "light_yellow" => Some(Color::LightYellow),
        "light_blue" => Some(Color::LightBlue),
        "light_magenta" => Some(Color::LightMagenta),
        "light_cyan" => Some(Color::LightCyan),
        "white" => Some(Color::White),
        s if s.starts_with('#') && s.len() == 7 => {
            let r = u8::from_str_radix(&s[1..3], 16).ok()?;
            let g = u8::from_str_radix(&s[3..5], 16).ok()?;
            let b = u8::from_str_radix(&s[5..7], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        s if s.starts_with("indexed:") => {
            let n: u8 = s["indexed:".len()..].parse().ok()?;
            Some(Color::Indexed(n))
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
