use crate::registry::{self, SettingValue, ShadowPosition, SETTINGS};
use crate::theme::ThemeConfig;
use fade_core::{Rgb, Rgba};
use std::collections::HashMap;
use toml::Table;
use tracing::warn;

/// Key prefix under which per-app changes are reported by [`SettingsStore::diff`].
pub const APP_KEY_PREFIX: &str = "apps.";

/// Key under which a changed `[theme]` table is reported by [`SettingsStore::diff`].
pub const THEME_KEY: &str = "theme";

/// Per-app overrides, keyed by application id in [`SettingsStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    /// Overrides only apply while this is set.
    pub enable_background_tweaks: bool,
    pub maximized_opacity:        Option<u8>,
    pub panel_color:              Option<Rgb>,
}

impl AppSettings {
    /// Whether this section takes part in resolution at all.
    pub fn applies(&self) -> bool {
        self.enable_background_tweaks
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            enable_background_tweaks: true,
            maximized_opacity:        None,
            panel_color:              None,
        }
    }
}

/// Parsed, typed settings.  Every registered global key always holds a value;
/// malformed or missing entries fall back to the registry default.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsStore {
    values: HashMap<&'static str, SettingValue>,
    apps:   HashMap<String, AppSettings>,
    theme:  ThemeConfig,
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self {
            values: SETTINGS.iter().map(|s| (s.key, (s.default)())).collect(),
            apps:   HashMap::new(),
            theme:  ThemeConfig::default(),
        }
    }
}

impl SettingsStore {
    /// Build a store from a parsed TOML document.
    ///
    /// Unknown keys and values that fail their parser are logged and ignored.
    pub fn from_table(table: &Table) -> Self {
        let mut store = Self::default();

        for (key, raw) in table {
            if key == "apps" {
                match raw.as_table() {
                    Some(apps) => store.apps = parse_apps(apps),
                    None => warn!("'apps' must be a table of per-app sections; ignoring"),
                }
                continue;
            }
            if key == THEME_KEY {
                let parsed: Result<ThemeConfig, _> = raw.clone().try_into();
                match parsed {
                    Ok(theme) => store.theme = theme,
                    Err(e) => warn!("Malformed [theme] table ({e}); using the default theme"),
                }
                continue;
            }

            let Some(spec) = registry::lookup(key) else {
                warn!("Unknown setting '{key}'; ignoring");
                continue;
            };

            match (spec.parse)(raw) {
                Some(value) => {
                    store.values.insert(spec.key, value);
                }
                None => warn!(
                    "Malformed value for '{key}' (expected {:?}); using default",
                    spec.value_type
                ),
            }
        }

        store
    }

    /// Per-app overrides for `app_id`, if a section exists.
    pub fn app(&self, app_id: &str) -> Option<&AppSettings> {
        self.apps.get(app_id)
    }

    /// Native panel colours from the `[theme]` table.
    pub fn theme(&self) -> &ThemeConfig {
        &self.theme
    }

    /// Keys whose value differs between `self` and `newer`.
    ///
    /// Global keys are reported by name, app sections as `apps.<id>` and the
    /// theme table as `theme`.
    pub fn diff(&self, newer: &Self) -> Vec<String> {
        let mut changed: Vec<String> = SETTINGS
            .iter()
            .filter(|s| self.values.get(s.key) != newer.values.get(s.key))
            .map(|s| s.key.to_string())
            .collect();

        let mut app_ids: Vec<&String> = self.apps.keys().chain(newer.apps.keys()).collect();
        app_ids.sort();
        app_ids.dedup();
        changed.extend(
            app_ids
                .into_iter()
                .filter(|id| self.apps.get(*id) != newer.apps.get(*id))
                .map(|id| format!("{APP_KEY_PREFIX}{id}")),
        );
        if self.theme != newer.theme {
            changed.push(THEME_KEY.to_string());
        }

        changed
    }

    // ── Typed getters ─────────────────────────────────────────────────────────

    pub fn hide_corners(&self) -> bool {
        self.bool("hide-corners")
    }

    /// Transition duration in milliseconds.
    pub fn transition_speed(&self) -> u64 {
        u64::try_from(self.int("transition-speed")).unwrap_or(0)
    }

    pub fn force_animation(&self) -> bool {
        self.bool("force-animation")
    }

    pub fn transition_type(&self) -> i64 {
        self.int("transition-type")
    }

    pub fn unmaximized_opacity(&self) -> u8 {
        self.opacity("unmaximized-opacity")
    }

    pub fn maximized_opacity(&self) -> u8 {
        self.opacity("maximized-opacity")
    }

    pub fn enable_custom_opacity(&self) -> bool {
        self.bool("enable-opacity")
    }

    pub fn panel_color(&self) -> Rgb {
        self.color("panel-color")
    }

    pub fn enable_custom_background_color(&self) -> bool {
        self.bool("enable-background-color")
    }

    pub fn trigger_apps(&self) -> &[String] {
        self.list("trigger-apps")
    }

    pub fn trigger_windows(&self) -> &[String] {
        self.list("trigger-windows")
    }

    pub fn add_text_shadow(&self) -> bool {
        self.bool("text-shadow")
    }

    pub fn add_icon_shadow(&self) -> bool {
        self.bool("icon-shadow")
    }

    pub fn text_shadow_position(&self) -> ShadowPosition {
        self.position("text-shadow-position")
    }

    pub fn icon_shadow_position(&self) -> ShadowPosition {
        self.position("icon-shadow-position")
    }

    pub fn text_shadow_color(&self) -> Rgba {
        self.color_alpha("text-shadow-color")
    }

    pub fn icon_shadow_color(&self) -> Rgba {
        self.color_alpha("icon-shadow-color")
    }

    pub fn enable_text_color(&self) -> bool {
        self.bool("enable-text-color")
    }

    pub fn text_color(&self) -> Rgb {
        self.color("text-color")
    }

    pub fn maximized_text_color(&self) -> Rgb {
        self.color("maximized-text-color")
    }

    pub fn enable_maximized_text_color(&self) -> bool {
        self.bool("enable-maximized-text-color")
    }

    pub fn remove_panel_styling(&self) -> bool {
        self.bool("remove-panel-styling")
    }

    // ── Raw access ────────────────────────────────────────────────────────────

    fn get(&self, key: &'static str) -> Option<&SettingValue> {
        self.values.get(key)
    }

    fn bool(&self, key: &'static str) -> bool {
        matches!(self.get(key), Some(SettingValue::Bool(true)))
    }

    fn int(&self, key: &'static str) -> i64 {
        match self.get(key) {
            Some(SettingValue::Int(n)) => *n,
            _ => 0,
        }
    }

    fn opacity(&self, key: &'static str) -> u8 {
        u8::try_from(self.int(key)).unwrap_or(u8::MAX)
    }

    fn list(&self, key: &'static str) -> &[String] {
        match self.get(key) {
            Some(SettingValue::StrList(items)) => items,
            _ => &[],
        }
    }

    fn color(&self, key: &'static str) -> Rgb {
        match self.get(key) {
            Some(SettingValue::Color(c)) => *c,
            _ => Rgb::BLACK,
        }
    }

    fn color_alpha(&self, key: &'static str) -> Rgba {
        match self.get(key) {
            Some(SettingValue::ColorAlpha(c)) => *c,
            _ => Rgba::TRANSPARENT,
        }
    }

    fn position(&self, key: &'static str) -> ShadowPosition {
        match self.get(key) {
            Some(SettingValue::Position(p)) => *p,
            _ => ShadowPosition::default(),
        }
    }
}

fn parse_apps(apps: &Table) -> HashMap<String, AppSettings> {
    let mut out = HashMap::new();

    for (app_id, section) in apps {
        let Some(section) = section.as_table() else {
            warn!("Per-app entry '{app_id}' is not a table; ignoring");
            continue;
        };

        let mut app = AppSettings::default();
        for (key, raw) in section {
            let Some(spec) = registry::lookup_app(key) else {
                warn!("Unknown per-app setting '{key}' for '{app_id}'; ignoring");
                continue;
            };
            match ((spec.parse)(raw), spec.key) {
                (Some(SettingValue::Bool(b)), "enable-background-tweaks") => {
                    app.enable_background_tweaks = b;
                }
                (Some(SettingValue::Int(n)), "maximized-opacity") => {
                    app.maximized_opacity = u8::try_from(n).ok();
                }
                (Some(SettingValue::Color(c)), "panel-color") => app.panel_color = Some(c),
                _ => warn!(
                    "Malformed per-app value '{key}' for '{app_id}'; falling back to global"
                ),
            }
        }
        out.insert(app_id.clone(), app);
    }

    out
}

/// Convenience for tests and callers holding raw TOML text.
impl std::str::FromStr for SettingsStore {
    type Err = toml::de::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let table: Table = toml::from_str(raw)?;
        Ok(Self::from_table(&table))
    }
}
