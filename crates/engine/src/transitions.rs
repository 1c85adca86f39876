//! Transition engine.
//!
//! Animates the panel background towards its target and applies discrete
//! properties (foreground colours, shadows) through the [`StyleApplier`].
//! A newer request for a property retargets the running animation from its
//! current interpolated value instead of queueing.

use crate::easing::Easing;
use crate::SharedApplier;
use fade_config::SettingsStore;
use fade_core::{state::corner_for, ForegroundColor, Rgba, Shadow, Variant};
use fade_theme::Foreground;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, error, trace};

/// A styled panel property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    Background,
    Text,
    Icon,
    Arrow,
    TextShadow,
    IconShadow,
}

impl Property {
    pub const ALL: [Property; 6] = [
        Property::Background,
        Property::Text,
        Property::Icon,
        Property::Arrow,
        Property::TextShadow,
        Property::IconShadow,
    ];

    fn foreground(self) -> Option<Foreground> {
        match self {
            Property::Text => Some(Foreground::Text),
            Property::Icon => Some(Foreground::Icon),
            Property::Arrow => Some(Foreground::Arrow),
            _ => None,
        }
    }
}

/// Value of a [`Property`].  Only `Color` values are interpolated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StyleValue {
    Color(Rgba),
    Foreground(Option<ForegroundColor>),
    Shadow(Option<Shadow>),
}

/// One pending change of one property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionRequest {
    pub property: Property,
    pub from:     StyleValue,
    pub to:       StyleValue,
    pub duration: Duration,
    pub easing:   Easing,
}

#[derive(Debug, Clone, Copy)]
struct Animation {
    from:     Rgba,
    to:       Rgba,
    started:  Instant,
    duration: Duration,
    easing:   Easing,
}

impl Animation {
    fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    fn value_at(&self, now: Instant) -> Rgba {
        interpolate(self.from, self.to, self.easing.apply(self.progress(now)))
    }

    fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }
}

/// Linear blend in native channel ranges; alpha is blended on its own.
pub fn interpolate(from: Rgba, to: Rgba, t: f32) -> Rgba {
    let channel = |a: u8, b: u8| {
        let (a, b) = (f32::from(a), f32::from(b));
        (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
    };
    Rgba {
        red:   channel(from.red, to.red),
        green: channel(from.green, to.green),
        blue:  channel(from.blue, to.blue),
        alpha: interpolate_alpha(from.alpha, to.alpha, t),
    }
}

fn interpolate_alpha(from: f32, to: f32, t: f32) -> f32 {
    (from + (to - from) * t).clamp(0.0, 1.0)
}

/// Smaller than one 8-bit step on every channel.
fn below_threshold(a: Rgba, b: Rgba) -> bool {
    a.rgb() == b.rgb() && (a.alpha - b.alpha).abs() < 1.0 / 255.0
}

pub struct TransitionEngine {
    applier:         SharedApplier,
    animations:      HashMap<Property, Animation>,
    applied:         HashMap<Property, StyleValue>,
    easing:          Easing,
    duration:        Duration,
    force_animation: bool,
    corners_hidden:  bool,
}

impl TransitionEngine {
    pub fn new(applier: SharedApplier) -> Self {
        Self {
            applier,
            animations: HashMap::new(),
            applied: HashMap::new(),
            easing: Easing::default(),
            duration: Duration::from_millis(1000),
            force_animation: false,
            corners_hidden: false,
        }
    }

    /// Pick up timing, curve and corner settings.
    pub fn configure(&mut self, settings: &SettingsStore) {
        self.set_timing(
            Duration::from_millis(settings.transition_speed()),
            settings.force_animation(),
        );
        self.update_transition_type(Easing::from_transition_type(settings.transition_type()));
        self.corners_hidden = settings.hide_corners();
    }

    pub fn set_timing(&mut self, duration: Duration, force_animation: bool) {
        self.duration = duration;
        self.force_animation = force_animation;
    }

    /// Later animations use `easing`; running ones keep their curve.
    pub fn update_transition_type(&mut self, easing: Easing) {
        debug!("Transition easing is now {easing:?}");
        self.easing = easing;
    }

    /// Re-apply the corner from the current background with new visibility.
    pub fn update_corner_alpha(&mut self, hidden: bool) {
        self.corners_hidden = hidden;
        if let Some(StyleValue::Color(background)) = self.applied.get(&Property::Background) {
            let corner = corner_for(*background, hidden);
            self.applier.borrow_mut().set_corner_color(corner);
        }
    }

    /// Record a value already present on the panel without touching it.
    pub fn seed(&mut self, property: Property, value: StyleValue) {
        self.applied.insert(property, value);
    }

    /// Value currently on the panel, if any was applied.
    pub fn current(&self, property: Property) -> Option<StyleValue> {
        self.applied.get(&property).copied()
    }

    pub fn is_animating(&self) -> bool {
        !self.animations.is_empty()
    }

    /// Build a request from the applied value to `to` with the current timing.
    pub fn request(&self, property: Property, to: StyleValue) -> TransitionRequest {
        TransitionRequest {
            property,
            from: self.current(property).unwrap_or(to),
            to,
            duration: self.duration,
            easing: self.easing,
        }
    }

    /// Begin or retarget a transition.
    ///
    /// With `force` (or the force-animation setting) even a change smaller
    /// than one channel step animates.
    pub fn animate(&mut self, request: TransitionRequest, force: bool, now: Instant) {
        let (from, to) = match (request.from, request.to) {
            (StyleValue::Color(from), StyleValue::Color(to)) => (from, to),
            (_, to) => {
                self.animations.remove(&request.property);
                self.apply(request.property, to);
                return;
            }
        };

        let from = match self.animations.get(&request.property) {
            Some(running) => {
                let current = running.value_at(now);
                trace!(property = ?request.property, ?current, "retargeting transition");
                current
            }
            None => from,
        };

        let skip = request.duration.is_zero()
            || (!force && !self.force_animation && below_threshold(from, to));
        if skip {
            self.animations.remove(&request.property);
            self.apply(request.property, StyleValue::Color(to));
            return;
        }

        self.animations.insert(
            request.property,
            Animation {
                from,
                to,
                started: now,
                duration: request.duration,
                easing: request.easing,
            },
        );
        self.apply(request.property, StyleValue::Color(from));
    }

    /// Advance every running animation.  Returns `true` while any is left.
    pub fn tick(&mut self, now: Instant) -> bool {
        let frame: Vec<(Property, Rgba, bool)> = self
            .animations
            .iter()
            .map(|(p, a)| (*p, a.value_at(now), a.is_finished(now)))
            .collect();

        for (property, value, finished) in frame {
            if finished {
                if let Some(done) = self.animations.remove(&property) {
                    self.apply(property, StyleValue::Color(done.to));
                }
            } else {
                self.apply(property, StyleValue::Color(value));
            }
        }

        self.is_animating()
    }

    /// Stop everything, leaving each animated property at its target.
    pub fn cleanup(&mut self) {
        let finished: Vec<(Property, Rgba)> =
            self.animations.drain().map(|(p, a)| (p, a.to)).collect();
        for (property, target) in finished {
            self.apply(property, StyleValue::Color(target));
        }
        self.applied.clear();
    }

    fn apply(&mut self, property: Property, value: StyleValue) {
        let mut applier = self.applier.borrow_mut();

        match (property, value) {
            (Property::Background, StyleValue::Color(color)) => {
                applier.set_panel_color(color);
                applier.set_corner_color(corner_for(color, self.corners_hidden));
            }
            (Property::Text | Property::Icon | Property::Arrow, StyleValue::Foreground(fg)) => {
                let Some(target) = property.foreground() else {
                    return;
                };
                applier.remove_foreground(target, Variant::Normal);
                applier.remove_foreground(target, Variant::Maximized);
                if let Some(fg) = fg {
                    let registered = applier
                        .register_foreground(target, fg.color, fg.variant)
                        .is_some();
                    if !registered || !applier.set_foreground(target, fg.variant) {
                        error!("Failed to enable {target:?} colouring");
                    }
                }
            }
            (Property::TextShadow, StyleValue::Shadow(shadow)) => {
                if applier.has_text_shadow() {
                    applier.remove_text_shadow();
                }
                if let Some(shadow) = shadow {
                    let registered = applier.register_text_shadow(shadow).is_some();
                    if !registered || !applier.add_text_shadow() {
                        error!("Failed to enable text shadowing");
                    }
                }
            }
            (Property::IconShadow, StyleValue::Shadow(shadow)) => {
                if applier.has_icon_shadow() {
                    applier.remove_icon_shadow();
                }
                if let Some(shadow) = shadow {
                    let registered = applier.register_icon_shadow(shadow).is_some();
                    if !registered || !applier.add_icon_shadow() {
                        error!("Failed to enable icon shadowing");
                    }
                }
            }
            (property, value) => {
                error!("Value {value:?} does not fit property {property:?}; ignoring");
                return;
            }
        }

        drop(applier);
        self.applied.insert(property, value);
    }
}

impl std::fmt::Debug for TransitionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionEngine")
            .field("animations", &self.animations.len())
            .field("easing", &self.easing)
            .field("duration", &self.duration)
            .field("force_animation", &self.force_animation)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, Recorder};
    use fade_core::Rgb;

    fn engine(recorder: &Recorder) -> TransitionEngine {
        let mut engine = TransitionEngine::new(recorder.shared());
        engine.update_transition_type(Easing::Linear);
        engine
    }

    fn color(request: &StyleValue) -> Rgba {
        match request {
            StyleValue::Color(c) => *c,
            other => panic!("not a colour: {other:?}"),
        }
    }

    fn background(from: Rgba, to: Rgba, ms: u64) -> TransitionRequest {
        TransitionRequest {
            property: Property::Background,
            from: StyleValue::Color(from),
            to: StyleValue::Color(to),
            duration: Duration::from_millis(ms),
            easing: Easing::Linear,
        }
    }

    #[test]
    fn interpolates_channels_and_alpha_independently() {
        let mid = interpolate(Rgba::new(0, 100, 200, 0.0), Rgba::new(100, 100, 0, 1.0), 0.5);
        assert_eq!(mid, Rgba::new(50, 100, 100, 0.5));
    }

    #[test]
    fn retargets_from_current_value() {
        let recorder = Recorder::default();
        let mut engine = engine(&recorder);
        let start = Instant::now();
        let black = Rgb::BLACK;

        engine.animate(background(black.with_alpha(0.0), black.with_alpha(1.0), 1000), false, start);
        let half = start + Duration::from_millis(500);
        engine.tick(half);
        assert!((color(&engine.current(Property::Background).unwrap()).alpha - 0.5).abs() < 1e-3);

        // New target 0 arrives half way: the next animation starts at 0.5.
        engine.animate(background(black.with_alpha(1.0), black.with_alpha(0.0), 1000), false, half);
        let restarted = color(&engine.current(Property::Background).unwrap()).alpha;
        assert!((restarted - 0.5).abs() < 1e-3, "restarted from {restarted}");

        engine.tick(half + Duration::from_millis(500));
        let quarter = color(&engine.current(Property::Background).unwrap()).alpha;
        assert!((quarter - 0.25).abs() < 1e-3, "got {quarter}");
    }

    #[test]
    fn finishes_exactly_on_target() {
        let recorder = Recorder::default();
        let mut engine = engine(&recorder);
        let start = Instant::now();
        let target = Rgba::new(10, 20, 30, 0.8);

        engine.animate(background(Rgba::TRANSPARENT, target, 200), false, start);
        assert!(engine.is_animating());
        assert!(!engine.tick(start + Duration::from_millis(250)));
        assert_eq!(engine.current(Property::Background), Some(StyleValue::Color(target)));
        assert_eq!(recorder.last_panel_color(), Some(target));
    }

    #[test]
    fn tiny_changes_skip_animation_unless_forced() {
        let recorder = Recorder::default();
        let mut engine = engine(&recorder);
        let now = Instant::now();
        let a = Rgba::new(5, 5, 5, 0.5);
        let b = Rgba::new(5, 5, 5, 0.501);

        engine.animate(background(a, b, 1000), false, now);
        assert!(!engine.is_animating());
        assert_eq!(recorder.last_panel_color(), Some(b));

        engine.animate(background(b, a, 1000), true, now);
        assert!(engine.is_animating());
    }

    #[test]
    fn running_animation_keeps_its_curve() {
        let recorder = Recorder::default();
        let mut engine = engine(&recorder);
        let start = Instant::now();

        engine.animate(
            background(Rgb::BLACK.with_alpha(0.0), Rgb::BLACK.with_alpha(1.0), 1000),
            false,
            start,
        );
        engine.update_transition_type(Easing::EaseInCubic);
        engine.tick(start + Duration::from_millis(500));
        let alpha = color(&engine.current(Property::Background).unwrap()).alpha;
        assert!((alpha - 0.5).abs() < 1e-3, "linear curve expected, got {alpha}");
        assert_eq!(engine.request(Property::Background, StyleValue::Color(Rgba::TRANSPARENT)).easing, Easing::EaseInCubic);
    }

    #[test]
    fn cleanup_applies_targets() {
        let recorder = Recorder::default();
        let mut engine = engine(&recorder);
        let start = Instant::now();
        let target = Rgba::new(200, 100, 0, 1.0);

        engine.animate(background(Rgba::TRANSPARENT, target, 1000), false, start);
        engine.tick(start + Duration::from_millis(300));
        engine.cleanup();

        assert!(!engine.is_animating());
        assert_eq!(recorder.last_panel_color(), Some(target));
        assert_eq!(engine.current(Property::Background), None);
    }

    #[test]
    fn corner_follows_background() {
        let recorder = Recorder::default();
        let mut engine = engine(&recorder);
        let start = Instant::now();

        engine.animate(
            background(Rgba::new(0, 0, 0, 0.0), Rgba::new(100, 50, 25, 1.0), 1000),
            false,
            start,
        );
        engine.tick(start + Duration::from_millis(400));
        let panel = recorder.last_panel_color().unwrap();
        let corner = recorder.last_corner_color().unwrap();
        assert_eq!(panel.rgb(), corner.rgb());
        assert_eq!(panel.alpha, corner.alpha);

        engine.update_corner_alpha(true);
        let corner = recorder.last_corner_color().unwrap();
        assert_eq!(corner.rgb(), panel.rgb());
        assert_eq!(corner.alpha, 0.0);
    }

    #[test]
    fn discrete_properties_apply_immediately() {
        let recorder = Recorder::default();
        let mut engine = engine(&recorder);
        let fg = ForegroundColor { color: Rgb::WHITE, variant: Variant::Maximized };

        let request = engine.request(Property::Text, StyleValue::Foreground(Some(fg)));
        engine.animate(request, false, Instant::now());

        assert!(!engine.is_animating());
        assert!(recorder
            .calls()
            .contains(&Call::SetForeground(Foreground::Text, Variant::Maximized)));
    }

    #[test]
    fn failed_registration_is_not_fatal() {
        let recorder = Recorder::default();
        recorder.fail_registrations();
        let mut engine = engine(&recorder);

        let request = engine.request(Property::TextShadow, StyleValue::Shadow(Some(Shadow::default())));
        engine.animate(request, false, Instant::now());

        assert!(!recorder.calls().contains(&Call::AddTextShadow));
        engine.animate(background(Rgba::TRANSPARENT, Rgba::new(1, 1, 1, 1.0), 0), false, Instant::now());
        assert_eq!(recorder.last_panel_color(), Some(Rgba::new(1, 1, 1, 1.0)));
    }
}
