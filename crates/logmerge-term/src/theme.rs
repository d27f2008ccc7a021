//! Colour themes for logmerge output.
//!
//! Themes are TOML files embedded in the binary via [`include_str!`], so the
//! tool works without any files on disk. Pick one with [`Theme::named`]
//! (`default` or `bold`) or parse your own with [`Theme::from_toml_str`].

use anyhow::bail;
use config::{Config, File, FileFormat};
use crossterm::style::{Attribute, Color, ContentStyle};
use serde::Deserialize;

const DEFAULT_THEME_SRC: &str = include_str!("themes/default.toml");
const BOLD_THEME_SRC: &str = include_str!("themes/bold.toml");

// ---------------------------------------------------------------------------
// Raw (serde) types mirroring the TOML structure
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
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
    fn into_style(self) -> ContentStyle {
        let mut style = ContentStyle::new();
        style.foreground_color = self.fg.as_deref().and_then(parse_color);
        style.background_color = self.bg.as_deref().and_then(parse_color);
        for (enabled, attribute) in [
            (self.bold, Attribute::Bold),
            (self.dim, Attribute::Dim),
            (self.italic, Attribute::Italic),
            (self.underlined, Attribute::Underlined),
        ] {
            if enabled {
                style.attributes.set(attribute);
            }
        }
        style
    }
}

#[derive(Debug, Deserialize)]
struct RawTheme {
    #[serde(default)]
    header: RawStyle,
    #[serde(default)]
    progress: RawStyle,
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

/// Resolved styles, ready to apply at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Style for the header pattern match.
    pub header: ContentStyle,
    /// Style for the "Reading files…" status line.
    pub progress: ContentStyle,
}

impl Default for Theme {
    fn default() -> Self {
        Self::load_default()
    }
}

impl Theme {
    /// Load and parse the embedded default theme.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed.
    pub fn load_default() -> Self {
        Self::from_toml_str(DEFAULT_THEME_SRC).expect("embedded default theme must be valid TOML")
    }

    /// Look up an embedded theme by name.
    pub fn named(name: &str) -> anyhow::Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "default" => Self::from_toml_str(DEFAULT_THEME_SRC),
            "bold" => Self::from_toml_str(BOLD_THEME_SRC),
            other => bail!("unknown theme {other:?} (expected \"default\" or \"bold\")"),
        }
    }

    /// Parse a theme from a TOML string. Unknown keys are ignored.
    pub fn from_toml_str(src: &str) -> anyhow::Result<Self> {
        let raw: RawTheme = Config::builder()
            .add_source(File::from_str(src, FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        Ok(Self {
            header: raw.header.into_style(),
            progress: raw.progress.into_style(),
        })
    }
}

// ---------------------------------------------------------------------------
// Colour parsing
// ---------------------------------------------------------------------------

/// Parse a colour name. Plain names are the normal ANSI colours, `light_*`
/// names the bright ones.
fn parse_color(s: &str) -> Option<Color> {
    match s.to_ascii_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::DarkRed),
        "green" => Some(Color::DarkGreen),
        "yellow" => Some(Color::DarkYellow),
        "blue" => Some(Color::DarkBlue),
        "magenta" => Some(Color::DarkMagenta),
        "cyan" => Some(Color::DarkCyan),
        "gray" | "grey" => Some(Color::Grey),
        "dark_gray" | "darkgray" | "dark_grey" | "darkgrey" => Some(Color::DarkGrey),
        "light_red" => Some(Color::Red),
        "light_green" => Some(Color::Green),
        "light_yellow" => Some(Color::Yellow),
        "light_blue" => Some(Color::Blue),
        "light_magenta" => Some(Color::Magenta),
        "light_cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        s if s.starts_with('#') && s.len() == 7 => {
            let r = u8::from_str_radix(s.get(1..3)?, 16).ok()?;
            let g = u8::from_str_radix(s.get(3..5)?, 16).ok()?;
            let b = u8::from_str_radix(s.get(5..7)?, 16).ok()?;
            Some(Color::Rgb { r, g, b })
        }
        s if s.starts_with("indexed:") => {
            let n: u8 = s.strip_prefix("indexed:")?.parse().ok()?;
            Some(Color::AnsiValue(n))
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
