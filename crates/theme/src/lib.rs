pub mod colors;
pub mod style;

pub use colors::Color;
pub use style::{Foreground, PanelStyle, StyleApplier, StyleHandle};

use fade_config::ThemeConfig;

/// The panel's own look before any recolouring, i.e. what the shell theme
/// would draw.
///
/// Invalid colour strings fall back to safe defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NativeTheme {
    pub background: Color,
    pub foreground: Color,
    pub border:     Color,
}

impl NativeTheme {
    /// Build a theme from the settings file's `[theme]` table.
    pub fn from_config(cfg: &ThemeConfig) -> Self {
        Self::from_hex(cfg.effective_background(), &cfg.foreground, &cfg.border)
    }

    /// Build a theme from hex colour strings (`#RRGGBB` or `#RRGGBBAA`).
    pub fn from_hex(background: &str, foreground: &str, border: &str) -> Self {
        Self {
            background: Color::from_hex(background).unwrap_or(Color::DARK),
            foreground: Color::from_hex(foreground).unwrap_or(Color::WHITE),
            border:     Color::from_hex(border).unwrap_or(Color::SURFACE),
        }
    }
}

impl Default for NativeTheme {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default())
    }
}
