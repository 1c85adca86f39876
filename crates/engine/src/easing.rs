//! Easing curves for panel transitions.

use tracing::warn;

/// Easing curve applied to transition progress.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Easing {
    Linear,
    EaseInQuad,
    EaseOutQuad,
    #[default]
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
}

impl Easing {
    /// Map the integer `transition-type` setting to a curve.
    pub fn from_transition_type(kind: i64) -> Self {
        match kind {
            0 => Easing::Linear,
            1 => Easing::EaseInQuad,
            2 => Easing::EaseOutQuad,
            3 => Easing::EaseInOutQuad,
            4 => Easing::EaseInCubic,
            5 => Easing::EaseOutCubic,
            6 => Easing::EaseInOutCubic,
            other => {
                warn!("Unknown transition type {other}; using ease-in-out");
                Easing::default()
            }
        }
    }

    /// Apply the curve to a progress value (clamped to `0.0..=1.0`).
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Easing::Linear => t,
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 7] = [
        Easing::Linear,
        Easing::EaseInQuad,
        Easing::EaseOutQuad,
        Easing::EaseInOutQuad,
        Easing::EaseInCubic,
        Easing::EaseOutCubic,
        Easing::EaseInOutCubic,
    ];

    #[test]
    fn endpoints_are_exact() {
        for easing in ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?}");
            assert_eq!(easing.apply(1.0), 1.0, "{easing:?}");
        }
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(Easing::Linear.apply(1.7), 1.0);
        assert_eq!(Easing::EaseOutCubic.apply(-0.3), 0.0);
    }

    #[test]
    fn unknown_type_falls_back() {
        assert_eq!(Easing::from_transition_type(0), Easing::Linear);
        assert_eq!(Easing::from_transition_type(42), Easing::EaseInOutQuad);
    }
}
