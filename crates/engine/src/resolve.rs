//! Override resolution: which tier decides the panel appearance for a window.

use fade_config::{AppSettings, SettingsStore};
use fade_core::{ForegroundColor, PanelAppearance, Rgb, Rgba, Shadow, Variant, WindowContext};

/// Resolution tiers, highest priority first.  Exactly one wins per pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Window title listed in `trigger-windows`.
    WindowTrigger,
    /// Per-app section for a solid (maximized or triggered) window.
    AppOverride,
    /// App listed in `trigger-apps`.
    AppTrigger,
    /// Global maximized settings.
    Maximized,
    /// Global unmaximized settings.
    Unmaximized,
    /// Custom colour and opacity are off: the panel theme decides.
    ThemeDefault,
}

/// Output of one resolution pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub tier:       Tier,
    /// `true` when the panel should look like it does over a maximized window.
    pub solid:      bool,
    pub appearance: PanelAppearance,
}

/// Walk the resolution table for `context`.
///
/// `theme` is the panel theme's own background colour and opacity.
pub fn resolve(context: &WindowContext, settings: &SettingsStore, theme: Rgba) -> Resolution {
    let (tier, solid) = select_tier(context, settings);

    let app = match tier {
        Tier::AppOverride => context.app_id.as_deref().and_then(|id| settings.app(id)),
        _ => None,
    };

    let rgb = app
        .and_then(|a| a.panel_color)
        .unwrap_or_else(|| background_rgb(settings, theme));

    let alpha = if solid {
        app.and_then(|a| a.maximized_opacity)
            .map(Rgba::alpha_from_opacity)
            .unwrap_or_else(|| solid_alpha(settings, theme))
    } else {
        transparent_alpha(settings)
    };

    let foreground = settings.enable_text_color().then(|| {
        if solid && settings.enable_maximized_text_color() {
            ForegroundColor { color: settings.maximized_text_color(), variant: Variant::Maximized }
        } else {
            ForegroundColor { color: settings.text_color(), variant: Variant::Normal }
        }
    });

    let text_shadow = (!solid && settings.add_text_shadow()).then(|| {
        let pos = settings.text_shadow_position();
        Shadow {
            color:       settings.text_shadow_color(),
            offset_x:    pos.x,
            offset_y:    pos.y,
            blur_radius: pos.blur,
        }
    });

    let icon_shadow = (!solid && settings.add_icon_shadow()).then(|| {
        let pos = settings.icon_shadow_position();
        Shadow {
            color:       settings.icon_shadow_color(),
            offset_x:    pos.x,
            offset_y:    pos.y,
            blur_radius: pos.blur,
        }
    });

    Resolution {
        tier,
        solid,
        appearance: PanelAppearance {
            background: rgb.with_alpha(alpha),
            corners_hidden: settings.hide_corners(),
            text: foreground,
            icon: foreground,
            arrow: foreground,
            text_shadow,
            icon_shadow,
        },
    }
}

fn select_tier(context: &WindowContext, settings: &SettingsStore) -> (Tier, bool) {
    let listed = |list: &[String], value: Option<&str>| {
        value.is_some_and(|v| list.iter().any(|item| item == v))
    };

    if listed(settings.trigger_windows(), context.window_title.as_deref()) {
        return (Tier::WindowTrigger, true);
    }

    let app_triggered = listed(settings.trigger_apps(), context.app_id.as_deref());
    let solid = context.is_maximized || app_triggered;

    let has_override = context
        .app_id
        .as_deref()
        .and_then(|id| settings.app(id))
        .is_some_and(AppSettings::applies);
    if solid && has_override {
        return (Tier::AppOverride, true);
    }

    if app_triggered {
        return (Tier::AppTrigger, true);
    }

    let customised = settings.enable_custom_opacity() || settings.enable_custom_background_color();
    match (customised, context.is_maximized) {
        (false, maximized) => (Tier::ThemeDefault, maximized),
        (true, true) => (Tier::Maximized, true),
        (true, false) => (Tier::Unmaximized, false),
    }
}

fn background_rgb(settings: &SettingsStore, theme: Rgba) -> Rgb {
    if settings.enable_custom_background_color() {
        settings.panel_color()
    } else {
        theme.rgb()
    }
}

fn solid_alpha(settings: &SettingsStore, theme: Rgba) -> f32 {
    if settings.enable_custom_opacity() {
        Rgba::alpha_from_opacity(settings.maximized_opacity())
    } else {
        theme.alpha
    }
}

fn transparent_alpha(settings: &SettingsStore) -> f32 {
    if settings.enable_custom_opacity() {
        Rgba::alpha_from_opacity(settings.unmaximized_opacity())
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::window;

    const THEME: Rgba = Rgba { red: 30, green: 30, blue: 46, alpha: 0.95 };

    fn settings(toml: &str) -> SettingsStore {
        toml.parse().unwrap()
    }

    #[test]
    fn per_app_override_beats_global_while_maximized() {
        let s = settings(
            "enable-opacity = true\nmaximized-opacity = 50\n[apps.firefox]\nmaximized-opacity = 80",
        );
        let r = resolve(&window("firefox", "Mozilla Firefox", true), &s, THEME);
        assert_eq!(r.tier, Tier::AppOverride);
        assert_eq!(r.appearance.background.alpha, Rgba::alpha_from_opacity(80));

        let other = resolve(&window("kitty", "~", true), &s, THEME);
        assert_eq!(other.tier, Tier::Maximized);
        assert_eq!(other.appearance.background.alpha, Rgba::alpha_from_opacity(50));
    }

    #[test]
    fn per_app_override_ignored_while_unmaximized() {
        let s = settings("enable-opacity = true\nunmaximized-opacity = 10\n[apps.firefox]\nmaximized-opacity = 80");
        let r = resolve(&window("firefox", "x", false), &s, THEME);
        assert_eq!(r.tier, Tier::Unmaximized);
        assert_eq!(r.appearance.background.alpha, Rgba::alpha_from_opacity(10));
    }

    #[test]
    fn disabled_per_app_section_falls_through() {
        let s = settings("enable-opacity = true\nmaximized-opacity = 50\n[apps.firefox]\nenable-background-tweaks = false\nmaximized-opacity = 80");
        let r = resolve(&window("firefox", "x", true), &s, THEME);
        assert_eq!(r.tier, Tier::Maximized);
        assert_eq!(r.appearance.background.alpha, Rgba::alpha_from_opacity(50));
    }

    #[test]
    fn window_trigger_wins_over_app_override() {
        let s = settings(
            "trigger-windows = [\"Picture-in-Picture\"]\nenable-opacity = true\nmaximized-opacity = 200\n[apps.firefox]\nmaximized-opacity = 80",
        );
        let r = resolve(&window("firefox", "Picture-in-Picture", false), &s, THEME);
        assert_eq!(r.tier, Tier::WindowTrigger);
        assert!(r.solid);
        assert_eq!(r.appearance.background.alpha, Rgba::alpha_from_opacity(200));
    }

    #[test]
    fn trigger_app_is_solid_when_unmaximized() {
        let s = settings("trigger-apps = [\"steam\"]");
        let r = resolve(&window("steam", "Steam", false), &s, THEME);
        assert_eq!(r.tier, Tier::AppTrigger);
        assert_eq!(r.appearance.background, THEME);
    }

    #[test]
    fn theme_default_when_nothing_is_customised() {
        let s = SettingsStore::default();
        let maximized = resolve(&window("kitty", "~", true), &s, THEME);
        assert_eq!(maximized.tier, Tier::ThemeDefault);
        assert_eq!(maximized.appearance.background, THEME);

        let empty = resolve(&WindowContext::default(), &s, THEME);
        assert!(!empty.solid);
        assert_eq!(empty.appearance.background, THEME.with_alpha(0.0));
    }

    #[test]
    fn per_app_color_replaces_only_color() {
        let s = settings(
            "enable-opacity = true\nmaximized-opacity = 50\nenable-background-color = true\npanel-color = [9, 9, 9]\n[apps.code]\npanel-color = [1, 2, 3]",
        );
        let r = resolve(&window("code", "main.rs", true), &s, THEME);
        assert_eq!(r.appearance.background, Rgba::new(1, 2, 3, Rgba::alpha_from_opacity(50)));
    }

    #[test]
    fn shadows_only_over_transparent_panel() {
        let s = settings("text-shadow = true\nicon-shadow = true");
        let clear = resolve(&window("kitty", "~", false), &s, THEME);
        assert!(clear.appearance.text_shadow.is_some());
        assert!(clear.appearance.icon_shadow.is_some());

        let solid = resolve(&window("kitty", "~", true), &s, THEME);
        assert!(solid.appearance.text_shadow.is_none());
        assert!(solid.appearance.icon_shadow.is_none());
    }

    #[test]
    fn maximized_text_color_variant() {
        let s = settings(
            "enable-text-color = true\ntext-color = [1, 1, 1]\nenable-maximized-text-color = true\nmaximized-text-color = [2, 2, 2]",
        );
        let normal = resolve(&window("a", "b", false), &s, THEME).appearance;
        assert_eq!(normal.text.unwrap().variant, Variant::Normal);
        assert_eq!(normal.icon, normal.text);

        let maximized = resolve(&window("a", "b", true), &s, THEME).appearance;
        assert_eq!(
            maximized.text,
            Some(ForegroundColor { color: Rgb::new(2, 2, 2), variant: Variant::Maximized })
        );
    }

    #[test]
    fn corner_rgb_always_matches_background() {
        let s = settings("enable-background-color = true\npanel-color = [12, 34, 56]\nhide-corners = true");
        for maximized in [false, true] {
            let appearance = resolve(&window("a", "b", maximized), &s, THEME).appearance;
            assert_eq!(appearance.corner().rgb(), appearance.background.rgb());
        }
    }
}
