use fade_core::{Rgb, Rgba};

/// Normalised RGBA colour (each channel in `[0.0, 1.0]`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const DARK:        Self = Self { r: 0.118, g: 0.118, b: 0.180, a: 1.0 }; // #1e1e2e
    pub const WHITE:       Self = Self { r: 0.804, g: 0.839, b: 0.957, a: 1.0 }; // #cdd6f4
    pub const SURFACE:     Self = Self { r: 0.192, g: 0.196, b: 0.267, a: 1.0 }; // #313244
    pub const TRANSPARENT: Self = Self { r: 0.0,   g: 0.0,   b: 0.0,   a: 0.0 };

    /// Parse a CSS-style hex color string (`#RRGGBB` or `#RRGGBBAA`).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');

        let byte = |s: &str| -> Option<u8> { u8::from_str_radix(s, 16).ok() };

        let rgb = Rgb::new(
            byte(hex.get(0..2)?)?,
            byte(hex.get(2..4)?)?,
            byte(hex.get(4..6)?)?,
        );
        match hex.len() {
            6 => Some(Self::from(rgb.with_alpha(1.0))),
            8 => Some(Self::from(rgb.with_alpha(f32::from(byte(hex.get(6..8)?)?) / 255.0))),
            _ => None,
        }
    }

    /// Convert to an [`iced::Color`] for use in Iced widgets.
    #[inline]
    pub fn to_iced(self) -> iced::Color {
        iced::Color::from_rgba(self.r, self.g, self.b, self.a)
    }

    /// Return a copy with the alpha channel set to `alpha`.
    #[inline]
    #[must_use]
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha.clamp(0.0, 1.0);
        self
    }

    /// Back to 8-bit channels, rounding to the nearest step.
    pub fn to_rgba(self) -> Rgba {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgba::new(channel(self.r), channel(self.g), channel(self.b), self.a)
    }
}

impl From<Rgba> for Color {
    fn from(c: Rgba) -> Self {
        Self {
            r: f32::from(c.red) / 255.0,
            g: f32::from(c.green) / 255.0,
            b: f32::from(c.blue) / 255.0,
            a: c.alpha,
        }
    }
}

impl From<Rgb> for Color {
    fn from(c: Rgb) -> Self {
        Self::from(c.with_alpha(1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_with_and_without_alpha() {
        assert_eq!(Color::from_hex("#1e1e2e").unwrap().to_rgba(), Rgba::new(0x1e, 0x1e, 0x2e, 1.0));
        let c = Color::from_hex("000000ff").unwrap();
        assert_eq!(c.a, 1.0);
        assert!(Color::from_hex("#12").is_none());
        assert!(Color::from_hex("#zzzzzz").is_none());
    }

    #[test]
    fn converts_from_core_colors() {
        let c = Color::from(Rgba::new(255, 0, 0, 0.5));
        assert_eq!((c.r, c.g, c.b, c.a), (1.0, 0.0, 0.0, 0.5));
        assert_eq!(Color::from(Rgb::WHITE).a, 1.0);
    }
}
