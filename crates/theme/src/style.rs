use crate::colors::Color;
use crate::NativeTheme;
use fade_core::{Rgb, Rgba, Shadow, Variant};
use std::collections::HashMap;
use tracing::debug;

/// Panel element a foreground colour is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Foreground {
    Text,
    Icon,
    Arrow,
}

impl Foreground {
    pub const ALL: [Foreground; 3] = [Foreground::Text, Foreground::Icon, Foreground::Arrow];
}

/// Handle returned by a successful style registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyleHandle(pub u64);

/// Imperative styling operations on the panel surface.
///
/// Registration calls return `None` when the style could not be created; the
/// caller logs it and carries on without that embellishment.
pub trait StyleApplier {
    /// Background colour of the panel's native theme.
    fn theme_background(&self) -> Rgba;

    fn set_panel_color(&mut self, color: Rgba);
    fn clear_panel_color(&mut self);

    fn set_corner_color(&mut self, color: Rgba);
    fn clear_corner_color(&mut self);

    /// Remove the native background colour and background image.
    fn strip_panel_background(&mut self);
    fn restore_panel_background(&mut self);

    /// Remove native decorations (border) around the panel.
    fn strip_panel_styling(&mut self);
    fn restore_panel_styling(&mut self);

    fn register_text_shadow(&mut self, shadow: Shadow) -> Option<StyleHandle>;
    /// Returns `false` if no text shadow is registered.
    fn add_text_shadow(&mut self) -> bool;
    fn remove_text_shadow(&mut self);
    fn has_text_shadow(&self) -> bool;

    /// Icon shadows also cover the menu arrows.
    fn register_icon_shadow(&mut self, shadow: Shadow) -> Option<StyleHandle>;
    fn add_icon_shadow(&mut self) -> bool;
    fn remove_icon_shadow(&mut self);
    fn has_icon_shadow(&self) -> bool;

    fn register_foreground(
        &mut self,
        target: Foreground,
        color: Rgb,
        variant: Variant,
    ) -> Option<StyleHandle>;
    /// Activate a registered colour.  Returns `false` if none is registered.
    fn set_foreground(&mut self, target: Foreground, variant: Variant) -> bool;
    fn remove_foreground(&mut self, target: Foreground, variant: Variant);
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Registered<T> {
    value:  T,
    active: bool,
}

/// The effective style of the panel surface, as rendered by the view.
#[derive(Debug, Clone)]
pub struct PanelStyle {
    native:              NativeTheme,
    panel_color:         Option<Color>,
    corner_color:        Option<Color>,
    background_stripped: bool,
    styling_stripped:    bool,
    text_shadow:         Option<Registered<Shadow>>,
    icon_shadow:         Option<Registered<Shadow>>,
    foregrounds:         HashMap<(Foreground, Variant), Rgb>,
    active_foreground:   HashMap<Foreground, Variant>,
    next_handle:         u64,
}

impl PanelStyle {
    pub fn new(native: NativeTheme) -> Self {
        Self {
            native,
            panel_color: None,
            corner_color: None,
            background_stripped: false,
            styling_stripped: false,
            text_shadow: None,
            icon_shadow: None,
            foregrounds: HashMap::new(),
            active_foreground: HashMap::new(),
            next_handle: 0,
        }
    }

    fn handle(&mut self) -> StyleHandle {
        self.next_handle += 1;
        StyleHandle(self.next_handle)
    }

    // ── Effective values read by the view ─────────────────────────────────────

    /// Panel background: our colour if set, otherwise the native one unless stripped.
    pub fn background(&self) -> Color {
        match self.panel_color {
            Some(c) => c,
            None if self.background_stripped => Color::TRANSPARENT,
            None => self.native.background,
        }
    }

    pub fn corner(&self) -> Color {
        self.corner_color.unwrap_or_else(|| self.background())
    }

    /// Native border, gone while styling is stripped.
    pub fn border(&self) -> Option<Color> {
        (!self.styling_stripped).then_some(self.native.border)
    }

    pub fn foreground(&self, target: Foreground) -> Color {
        self.active_foreground
            .get(&target)
            .and_then(|variant| self.foregrounds.get(&(target, *variant)))
            .map_or(self.native.foreground, |rgb| Color::from(*rgb))
    }

    pub fn text_shadow(&self) -> Option<Shadow> {
        self.text_shadow.filter(|s| s.active).map(|s| s.value)
    }

    pub fn icon_shadow(&self) -> Option<Shadow> {
        self.icon_shadow.filter(|s| s.active).map(|s| s.value)
    }

    /// `true` when nothing of ours is left on the panel.
    pub fn is_pristine(&self) -> bool {
        self.panel_color.is_none()
            && self.corner_color.is_none()
            && !self.background_stripped
            && !self.styling_stripped
            && self.text_shadow().is_none()
            && self.icon_shadow().is_none()
            && self.active_foreground.is_empty()
    }
}

impl StyleApplier for PanelStyle {
    fn theme_background(&self) -> Rgba {
        self.native.background.to_rgba()
    }

    fn set_panel_color(&mut self, color: Rgba) {
        self.panel_color = Some(Color::from(color));
    }

    fn clear_panel_color(&mut self) {
        self.panel_color = None;
    }

    fn set_corner_color(&mut self, color: Rgba) {
        self.corner_color = Some(Color::from(color));
    }

    fn clear_corner_color(&mut self) {
        self.corner_color = None;
    }

    fn strip_panel_background(&mut self) {
        self.background_stripped = true;
    }

    fn restore_panel_background(&mut self) {
        self.background_stripped = false;
    }

    fn strip_panel_styling(&mut self) {
        self.styling_stripped = true;
    }

    fn restore_panel_styling(&mut self) {
        self.styling_stripped = false;
    }

    fn register_text_shadow(&mut self, shadow: Shadow) -> Option<StyleHandle> {
        let active = self.text_shadow.is_some_and(|s| s.active);
        self.text_shadow = Some(Registered { value: shadow, active });
        Some(self.handle())
    }

    fn add_text_shadow(&mut self) -> bool {
        match &mut self.text_shadow {
            Some(s) => {
                s.active = true;
                true
            }
            None => false,
        }
    }

    fn remove_text_shadow(&mut self) {
        if let Some(s) = &mut self.text_shadow {
            s.active = false;
        }
    }

    fn has_text_shadow(&self) -> bool {
        self.text_shadow().is_some()
    }

    fn register_icon_shadow(&mut self, shadow: Shadow) -> Option<StyleHandle> {
        let active = self.icon_shadow.is_some_and(|s| s.active);
        self.icon_shadow = Some(Registered { value: shadow, active });
        Some(self.handle())
    }

    fn add_icon_shadow(&mut self) -> bool {
        match &mut self.icon_shadow {
            Some(s) => {
                s.active = true;
                true
            }
            None => false,
        }
    }

    fn remove_icon_shadow(&mut self) {
        if let Some(s) = &mut self.icon_shadow {
            s.active = false;
        }
    }

    fn has_icon_shadow(&self) -> bool {
        self.icon_shadow().is_some()
    }

    fn register_foreground(
        &mut self,
        target: Foreground,
        color: Rgb,
        variant: Variant,
    ) -> Option<StyleHandle> {
        self.foregrounds.insert((target, variant), color);
        Some(self.handle())
    }

    fn set_foreground(&mut self, target: Foreground, variant: Variant) -> bool {
        if !self.foregrounds.contains_key(&(target, variant)) {
            return false;
        }
        self.active_foreground.insert(target, variant);
        true
    }

    fn remove_foreground(&mut self, target: Foreground, variant: Variant) {
        if self.active_foreground.get(&target) == Some(&variant) {
            debug!("Removing {variant:?} {target:?} colour");
            self.active_foreground.remove(&target);
        }
    }
}
