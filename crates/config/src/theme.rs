use serde::{Deserialize, Serialize};

/// The panel's native colours, from the `[theme]` table of the settings file.
///
/// Colours are hex strings (`#RRGGBB` or `#RRGGBBAA`); they are parsed by
/// `fade-theme`, which falls back to its defaults for anything invalid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ThemeConfig {
    /// Panel background, alpha included.
    pub background: String,
    pub foreground: String,
    pub border: String,
    /// Colour of a background image drawn by the theme.  Wins over
    /// `background` when set, since the image is what the user sees.
    pub background_image: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            background:       "#1e1e2ef2".into(), // Catppuccin Mocha base, 95%
            foreground:       "#cdd6f4".into(),   // Catppuccin Mocha text
            border:           "#313244".into(),   // Catppuccin Mocha surface0
            background_image: String::new(),
        }
    }
}

impl ThemeConfig {
    /// The colour the panel background actually shows.
    pub fn effective_background(&self) -> &str {
        if self.background_image.is_empty() {
            &self.background
        } else {
            &self.background_image
        }
    }
}
