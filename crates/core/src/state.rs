/// 8-bit RGB colour, as stored in settings tuples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub red:   u8,
    pub green: u8,
    pub blue:  u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Attach an alpha channel (clamped to `[0, 1]`).
    #[inline]
    #[must_use]
    pub fn with_alpha(self, alpha: f32) -> Rgba {
        Rgba {
            red:   self.red,
            green: self.green,
            blue:  self.blue,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }
}

/// 8-bit RGB colour with a normalised alpha channel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgba {
    pub red:   u8,
    pub green: u8,
    pub blue:  u8,
    /// Opacity in `[0.0, 1.0]`.
    pub alpha: f32,
}

impl Rgba {
    pub const TRANSPARENT: Self = Self { red: 0, green: 0, blue: 0, alpha: 0.0 };

    pub fn new(red: u8, green: u8, blue: u8, alpha: f32) -> Self {
        Rgb::new(red, green, blue).with_alpha(alpha)
    }

    #[inline]
    pub fn rgb(&self) -> Rgb {
        Rgb::new(self.red, self.green, self.blue)
    }

    #[inline]
    #[must_use]
    pub fn with_alpha(self, alpha: f32) -> Self {
        self.rgb().with_alpha(alpha)
    }

    /// Convert an 8-bit opacity setting (0–255) to a normalised alpha.
    #[inline]
    pub fn alpha_from_opacity(opacity: u8) -> f32 {
        f32::from(opacity) / 255.0
    }
}

/// Which registered style a foreground colour belongs to.
///
/// The maximized variant is registered separately so both can coexist on the
/// panel and only the class is swapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Variant {
    #[default]
    Normal,
    Maximized,
}

/// A text/icon/arrow colour override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForegroundColor {
    pub color:   Rgb,
    pub variant: Variant,
}

/// Drop shadow applied to panel text or icons.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Shadow {
    pub color:       Rgba,
    pub offset_x:    i32,
    pub offset_y:    i32,
    pub blur_radius: i32,
}

/// What the panel should look like right now.
///
/// The corner colour is derived from [`background`](Self::background) and is
/// never stored on its own, so corners cannot drift from the panel colour.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PanelAppearance {
    pub background:    Rgba,
    /// Corners are drawn fully transparent while set.
    pub corners_hidden: bool,
    pub text:          Option<ForegroundColor>,
    pub icon:          Option<ForegroundColor>,
    pub arrow:         Option<ForegroundColor>,
    pub text_shadow:   Option<Shadow>,
    pub icon_shadow:   Option<Shadow>,
}

impl PanelAppearance {
    /// Corner colour for the current background.
    pub fn corner(&self) -> Rgba {
        corner_for(self.background, self.corners_hidden)
    }
}

/// Corner colour matching `background`: same RGB, background alpha unless hidden.
pub fn corner_for(background: Rgba, hidden: bool) -> Rgba {
    if hidden {
        background.with_alpha(0.0)
    } else {
        background
    }
}

/// Focused-window facts a resolution pass works from.  Derived on demand.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WindowContext {
    pub is_maximized: bool,
    /// Application identifier (window class under Hyprland).
    pub app_id:       Option<String>,
    pub window_title: Option<String>,
}

impl WindowContext {
    /// `true` when no window is focused at all (empty workspace).
    pub fn is_empty(&self) -> bool {
        self.app_id.is_none() && self.window_title.is_none()
    }
}

/// Anything that can report the focused window's current context.
pub trait WindowSource {
    fn window_context(&self) -> WindowContext;
}

impl<T: WindowSource> WindowSource for std::cell::RefCell<T> {
    fn window_context(&self) -> WindowContext {
        self.borrow().window_context()
    }
}
