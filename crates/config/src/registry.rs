//! Typed settings registry.
//!
//! Every supported key is declared once, with its value type, the parser that
//! turns the raw TOML value into a [`SettingValue`], its default, and what the
//! engine has to do when it changes.  Per-app keys live in a separate table.

use fade_core::{Rgb, Rgba};
use toml::Value;

/// Declared storage type of a setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Bool,
    Int,
    StrList,
    /// Fixed-length integer tuple, e.g. `[r, g, b]` or `[x, y, blur]`.
    IntTuple(usize),
    /// `[r, g, b, alpha]` with a fractional alpha.
    TupleWithAlpha,
}

/// Shadow offset and blur, stored as an `[x, y, blur]` tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShadowPosition {
    pub x:    i32,
    pub y:    i32,
    pub blur: i32,
}

/// A parsed setting value.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    StrList(Vec<String>),
    Color(Rgb),
    ColorAlpha(Rgba),
    Position(ShadowPosition),
}

/// Reaction the engine performs when a key changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeAction {
    /// Nothing beyond storing the value.
    None,
    /// Force a full re-resolution of the panel appearance.
    Reresolve,
    /// Re-apply corner alpha from the current background.
    UpdateCorners,
    /// Swap the easing curve used by later transitions.
    UpdateTransitionType,
    /// Pick up new transition duration / force-animation flag.
    UpdateTransitionSpeed,
    /// Re-register and toggle text/icon shadows.
    Shadows,
    /// Re-register and toggle foreground colours.
    TextColor,
    /// Strip or restore the panel's native styling.
    PanelStyling,
}

/// One registry record.
#[derive(Debug, Clone, Copy)]
pub struct SettingSpec {
    pub key:        &'static str,
    pub value_type: ValueType,
    pub parse:      fn(&Value) -> Option<SettingValue>,
    pub default:    fn() -> SettingValue,
    pub action:     ChangeAction,
}

impl SettingSpec {
    const fn new(
        key: &'static str,
        value_type: ValueType,
        parse: fn(&Value) -> Option<SettingValue>,
        default: fn() -> SettingValue,
        action: ChangeAction,
    ) -> Self {
        Self { key, value_type, parse, default, action }
    }
}

// ── Global settings ───────────────────────────────────────────────────────────

pub const SETTINGS: &[SettingSpec] = &[
    SettingSpec::new("hide-corners", ValueType::Bool, parse_bool, || SettingValue::Bool(false), ChangeAction::UpdateCorners),
    SettingSpec::new("transition-speed", ValueType::Int, parse_duration_ms, || SettingValue::Int(1000), ChangeAction::UpdateTransitionSpeed),
    SettingSpec::new("force-animation", ValueType::Bool, parse_bool, || SettingValue::Bool(false), ChangeAction::UpdateTransitionSpeed),
    SettingSpec::new("transition-type", ValueType::Int, parse_int, || SettingValue::Int(3), ChangeAction::UpdateTransitionType),
    SettingSpec::new("unmaximized-opacity", ValueType::Int, parse_opacity, || SettingValue::Int(0), ChangeAction::Reresolve),
    SettingSpec::new("maximized-opacity", ValueType::Int, parse_opacity, || SettingValue::Int(255), ChangeAction::Reresolve),
    SettingSpec::new("enable-opacity", ValueType::Bool, parse_bool, || SettingValue::Bool(false), ChangeAction::Reresolve),
    SettingSpec::new("panel-color", ValueType::IntTuple(3), parse_rgb, || SettingValue::Color(Rgb::BLACK), ChangeAction::Reresolve),
    SettingSpec::new("enable-background-color", ValueType::Bool, parse_bool, || SettingValue::Bool(false), ChangeAction::Reresolve),
    SettingSpec::new("trigger-apps", ValueType::StrList, parse_str_list, || SettingValue::StrList(Vec::new()), ChangeAction::Reresolve),
    SettingSpec::new("trigger-windows", ValueType::StrList, parse_str_list, || SettingValue::StrList(Vec::new()), ChangeAction::Reresolve),
    SettingSpec::new("text-shadow", ValueType::Bool, parse_bool, || SettingValue::Bool(false), ChangeAction::Shadows),
    SettingSpec::new("icon-shadow", ValueType::Bool, parse_bool, || SettingValue::Bool(false), ChangeAction::Shadows),
    SettingSpec::new("text-shadow-position", ValueType::IntTuple(3), parse_position, default_position, ChangeAction::Shadows),
    SettingSpec::new("icon-shadow-position", ValueType::IntTuple(3), parse_position, default_position, ChangeAction::Shadows),
    SettingSpec::new("text-shadow-color", ValueType::TupleWithAlpha, parse_rgba, default_shadow_color, ChangeAction::Shadows),
    SettingSpec::new("icon-shadow-color", ValueType::TupleWithAlpha, parse_rgba, default_shadow_color, ChangeAction::Shadows),
    SettingSpec::new("enable-text-color", ValueType::Bool, parse_bool, || SettingValue::Bool(false), ChangeAction::TextColor),
    SettingSpec::new("text-color", ValueType::IntTuple(3), parse_rgb, || SettingValue::Color(Rgb::WHITE), ChangeAction::TextColor),
    SettingSpec::new("maximized-text-color", ValueType::IntTuple(3), parse_rgb, || SettingValue::Color(Rgb::WHITE), ChangeAction::TextColor),
    SettingSpec::new("enable-maximized-text-color", ValueType::Bool, parse_bool, || SettingValue::Bool(false), ChangeAction::Reresolve),
    SettingSpec::new("remove-panel-styling", ValueType::Bool, parse_bool, || SettingValue::Bool(false), ChangeAction::PanelStyling),
    // Accepted for older configs; there is no overview to recolour.
    SettingSpec::new("enable-overview-text-color", ValueType::Bool, parse_bool, || SettingValue::Bool(false), ChangeAction::None),
];

// ── Per-app settings (`[apps."<app-id>"]`) ────────────────────────────────────

pub const APP_SETTINGS: &[SettingSpec] = &[
    SettingSpec::new("enable-background-tweaks", ValueType::Bool, parse_bool, || SettingValue::Bool(true), ChangeAction::Reresolve),
    SettingSpec::new("maximized-opacity", ValueType::Int, parse_opacity, || SettingValue::Int(255), ChangeAction::Reresolve),
    SettingSpec::new("panel-color", ValueType::IntTuple(3), parse_rgb, || SettingValue::Color(Rgb::BLACK), ChangeAction::Reresolve),
];

/// Look up a global setting by key.
pub fn lookup(key: &str) -> Option<&'static SettingSpec> {
    SETTINGS.iter().find(|s| s.key == key)
}

/// Look up a per-app setting by key.
pub fn lookup_app(key: &str) -> Option<&'static SettingSpec> {
    APP_SETTINGS.iter().find(|s| s.key == key)
}

/// Change action for a key reported by [`SettingsStore::diff`](crate::SettingsStore::diff).
///
/// Per-app changes (`apps.<id>`) always re-resolve.
pub fn action_for(key: &str) -> ChangeAction {
    if key.starts_with(crate::store::APP_KEY_PREFIX) {
        return ChangeAction::Reresolve;
    }
    lookup(key).map_or(ChangeAction::None, |s| s.action)
}

// ── Parsers ───────────────────────────────────────────────────────────────────

fn parse_bool(v: &Value) -> Option<SettingValue> {
    v.as_bool().map(SettingValue::Bool)
}

fn parse_int(v: &Value) -> Option<SettingValue> {
    v.as_integer().map(SettingValue::Int)
}

fn parse_opacity(v: &Value) -> Option<SettingValue> {
    v.as_integer()
        .filter(|n| (0..=255).contains(n))
        .map(SettingValue::Int)
}

fn parse_duration_ms(v: &Value) -> Option<SettingValue> {
    v.as_integer().filter(|n| *n >= 0).map(SettingValue::Int)
}

fn parse_str_list(v: &Value) -> Option<SettingValue> {
    v.as_array()?
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect::<Option<Vec<_>>>()
        .map(SettingValue::StrList)
}

fn int_tuple<const N: usize>(v: &Value) -> Option<[i64; N]> {
    let items = v.as_array()?;
    if items.len() != N {
        return None;
    }
    let mut out = [0; N];
    for (slot, item) in out.iter_mut().zip(items) {
        *slot = item.as_integer()?;
    }
    Some(out)
}

fn channel(n: i64) -> Option<u8> {
    u8::try_from(n).ok()
}

fn parse_rgb(v: &Value) -> Option<SettingValue> {
    let [r, g, b] = int_tuple::<3>(v)?;
    Some(SettingValue::Color(Rgb::new(channel(r)?, channel(g)?, channel(b)?)))
}

fn parse_rgba(v: &Value) -> Option<SettingValue> {
    let items = v.as_array()?;
    let [r, g, b, a] = items.as_slice() else {
        return None;
    };
    let alpha = a.as_float().or_else(|| a.as_integer().map(|n| n as f64))?;
    if !(0.0..=1.0).contains(&alpha) {
        return None;
    }
    Some(SettingValue::ColorAlpha(Rgba::new(
        channel(r.as_integer()?)?,
        channel(g.as_integer()?)?,
        channel(b.as_integer()?)?,
        alpha as f32,
    )))
}

fn parse_position(v: &Value) -> Option<SettingValue> {
    let [x, y, blur] = int_tuple::<3>(v)?;
    Some(SettingValue::Position(ShadowPosition {
        x:    i32::try_from(x).ok()?,
        y:    i32::try_from(y).ok()?,
        blur: i32::try_from(blur).ok()?,
    }))
}

fn default_position() -> SettingValue {
    SettingValue::Position(ShadowPosition { x: 0, y: 2, blur: 5 })
}

fn default_shadow_color() -> SettingValue {
    SettingValue::ColorAlpha(Rgba::new(0, 0, 0, 0.5))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arr(items: &[i64]) -> Value {
        Value::Array(items.iter().map(|n| Value::Integer(*n)).collect())
    }

    #[test]
    fn keys_are_unique() {
        for (i, spec) in SETTINGS.iter().enumerate() {
            assert!(
                SETTINGS[i + 1..].iter().all(|other| other.key != spec.key),
                "duplicate key {}",
                spec.key
            );
        }
    }

    #[test]
    fn defaults_satisfy_declared_types() {
        for spec in SETTINGS.iter().chain(APP_SETTINGS) {
            let ok = matches!(
                (spec.value_type, (spec.default)()),
                (ValueType::Bool, SettingValue::Bool(_))
                    | (ValueType::Int, SettingValue::Int(_))
                    | (ValueType::StrList, SettingValue::StrList(_))
                    | (ValueType::IntTuple(3), SettingValue::Color(_) | SettingValue::Position(_))
                    | (ValueType::TupleWithAlpha, SettingValue::ColorAlpha(_))
            );
            assert!(ok, "default of {} does not match its type", spec.key);
        }
    }

    #[test]
    fn rgb_parser_rejects_out_of_range_channels() {
        assert_eq!(parse_rgb(&arr(&[1, 2, 3])), Some(SettingValue::Color(Rgb::new(1, 2, 3))));
        assert_eq!(parse_rgb(&arr(&[1, 2, 300])), None);
        assert_eq!(parse_rgb(&arr(&[1, 2])), None);
    }

    #[test]
    fn rgba_parser_accepts_fractional_alpha() {
        let v = Value::Array(vec![
            Value::Integer(10),
            Value::Integer(20),
            Value::Integer(30),
            Value::Float(0.25),
        ]);
        assert_eq!(
            parse_rgba(&v),
            Some(SettingValue::ColorAlpha(Rgba::new(10, 20, 30, 0.25)))
        );
    }

    #[test]
    fn opacity_must_fit_a_byte() {
        assert_eq!(parse_opacity(&Value::Integer(80)), Some(SettingValue::Int(80)));
        assert_eq!(parse_opacity(&Value::Integer(256)), None);
        assert_eq!(parse_opacity(&Value::String("80".into())), None);
    }

    #[test]
    fn app_changes_reresolve() {
        assert_eq!(action_for("apps.firefox"), ChangeAction::Reresolve);
        assert_eq!(action_for("hide-corners"), ChangeAction::UpdateCorners);
        assert_eq!(action_for("no-such-key"), ChangeAction::None);
    }

    #[test]
    fn overview_key_is_known_but_inert() {
        assert!(lookup("enable-overview-text-color").is_some());
        assert_eq!(action_for("enable-overview-text-color"), ChangeAction::None);
    }
}
