//! Event engine: turns desktop signals into panel transitions.
//!
//! Every subscribed signal triggers a full re-resolution of the panel
//! appearance.  The result is compared with the last resolved state and only
//! changed properties become transition requests, so repeated or racing
//! signals converge on the same state without restyling twice.

use crate::easing::Easing;
use crate::resolve::resolve;
use crate::transitions::{Property, StyleValue, TransitionEngine};
use crate::{SharedApplier, SharedSettings};
use fade_config::{registry, ChangeAction};
use fade_core::{
    DesktopSignal, FadeError, HandlerId, PanelAppearance, Result, Rgba, SignalHub, SignalKind,
    WindowSource,
};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// A handler this engine connected, so teardown can disconnect it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    pub signal: SignalKind,
    pub id:     HandlerId,
}

struct Resolver {
    settings:      SharedSettings,
    desktop:       Rc<dyn WindowSource>,
    applier:       SharedApplier,
    transitions:   Rc<RefCell<TransitionEngine>>,
    theme:         Rgba,
    last_resolved: Option<PanelAppearance>,
}

impl Resolver {
    fn window_updated(&mut self, force: bool, now: Instant) -> Result<usize> {
        let context = self.desktop.window_context();
        let resolution = {
            let settings = self
                .settings
                .try_borrow()
                .map_err(|_| FadeError::Reentrant("settings store"))?;
            resolve(&context, &settings, self.theme)
        };

        let target = resolution.appearance;
        if !force && self.last_resolved.as_ref() == Some(&target) {
            trace!(tier = ?resolution.tier, "panel appearance unchanged");
            return Ok(0);
        }

        let mut transitions = self
            .transitions
            .try_borrow_mut()
            .map_err(|_| FadeError::Reentrant("transition engine"))?;

        debug!(
            tier = ?resolution.tier,
            solid = resolution.solid,
            app = ?context.app_id,
            force,
            "resolved panel appearance"
        );

        let previous = self.last_resolved.replace(target.clone());

        if force || previous.as_ref().map(|p| p.corners_hidden) != Some(target.corners_hidden) {
            transitions.update_corner_alpha(target.corners_hidden);
        }

        let mut issued = 0;
        for property in Property::ALL {
            let to = value_of(&target, property);
            let changed = previous.as_ref().map(|p| value_of(p, property)) != Some(to);
            if force || changed {
                let request = transitions.request(property, to);
                transitions.animate(request, force, now);
                issued += 1;
            }
        }

        Ok(issued)
    }

    fn setting_changed(&mut self, key: &str, now: Instant) -> Result<()> {
        let action = registry::action_for(key);
        debug!("Setting '{key}' changed ({action:?})");

        match action {
            ChangeAction::None => {}
            ChangeAction::Reresolve | ChangeAction::Shadows | ChangeAction::TextColor => {
                self.window_updated(true, now)?;
            }
            ChangeAction::UpdateCorners => {
                self.window_updated(false, now)?;
            }
            ChangeAction::UpdateTransitionType => {
                let easing = Easing::from_transition_type(self.settings.borrow().transition_type());
                self.transitions.borrow_mut().update_transition_type(easing);
            }
            ChangeAction::UpdateTransitionSpeed => {
                let settings = self.settings.borrow();
                self.transitions.borrow_mut().set_timing(
                    Duration::from_millis(settings.transition_speed()),
                    settings.force_animation(),
                );
            }
            ChangeAction::PanelStyling => {
                let strip = self.settings.borrow().remove_panel_styling();
                let mut applier = self.applier.borrow_mut();
                if strip {
                    applier.strip_panel_styling();
                } else {
                    applier.restore_panel_styling();
                }
            }
        }

        Ok(())
    }
}

fn value_of(appearance: &PanelAppearance, property: Property) -> StyleValue {
    match property {
        Property::Background => StyleValue::Color(appearance.background),
        Property::Text => StyleValue::Foreground(appearance.text),
        Property::Icon => StyleValue::Foreground(appearance.icon),
        Property::Arrow => StyleValue::Foreground(appearance.arrow),
        Property::TextShadow => StyleValue::Shadow(appearance.text_shadow),
        Property::IconShadow => StyleValue::Shadow(appearance.icon_shadow),
    }
}

fn with_resolver<T>(
    resolver: &Weak<RefCell<Resolver>>,
    f: impl FnOnce(&mut Resolver) -> Result<T>,
) -> Result<T> {
    let resolver = resolver.upgrade().ok_or(FadeError::Disabled)?;
    let mut guard = resolver
        .try_borrow_mut()
        .map_err(|_| FadeError::Reentrant("event engine"))?;
    f(&mut guard)
}

/// Decides what the panel should look like and issues transitions.
pub struct EventEngine {
    resolver:    Rc<RefCell<Resolver>>,
    connections: Vec<Connection>,
}

impl EventEngine {
    pub fn new(
        settings: SharedSettings,
        desktop: Rc<dyn WindowSource>,
        applier: SharedApplier,
        transitions: Rc<RefCell<TransitionEngine>>,
        theme: Rgba,
    ) -> Self {
        Self {
            resolver: Rc::new(RefCell::new(Resolver {
                settings,
                desktop,
                applier,
                transitions,
                theme,
                last_resolved: None,
            })),
            connections: Vec::new(),
        }
    }

    /// Subscribe to every relevant signal, then resolve once with `force`.
    pub fn init(&mut self, hub: &mut SignalHub) -> Result<usize> {
        if !self.connections.is_empty() {
            warn!("Event engine already initialised");
            return Err(FadeError::AlreadyActive);
        }

        for signal in SignalKind::WINDOW {
            let resolver = Rc::downgrade(&self.resolver);
            let id = hub.connect(signal, move |_| {
                with_resolver(&resolver, |r| r.window_updated(false, Instant::now()).map(drop))
            });
            self.connections.push(Connection { signal, id });
        }

        let resolver = Rc::downgrade(&self.resolver);
        let id = hub.connect(SignalKind::SettingChanged, move |signal| match signal {
            DesktopSignal::SettingChanged(key) => {
                with_resolver(&resolver, |r| r.setting_changed(key, Instant::now()))
            }
            _ => Ok(()),
        });
        self.connections.push(Connection { signal: SignalKind::SettingChanged, id });

        self.window_updated(true)
    }

    /// Resolve the panel appearance for the current window.
    ///
    /// Returns the number of transition requests issued; `0` means the target
    /// was unchanged.
    pub fn window_updated(&self, force: bool) -> Result<usize> {
        self.window_updated_at(force, Instant::now())
    }

    pub fn window_updated_at(&self, force: bool, now: Instant) -> Result<usize> {
        with_resolver(&Rc::downgrade(&self.resolver), |r| r.window_updated(force, now))
    }

    /// Disconnect every handler connected by [`init`](Self::init).
    /// Safe to call repeatedly.
    pub fn cleanup(&mut self, hub: &mut SignalHub) {
        for connection in self.connections.drain(..) {
            if !hub.disconnect(connection.id) {
                debug!("Handler for {:?} was already disconnected", connection.signal);
            }
        }
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn last_resolved(&self) -> Option<PanelAppearance> {
        self.resolver.borrow().last_resolved.clone()
    }
}

impl std::fmt::Debug for EventEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEngine")
            .field("connections", &self.connections)
            .finish_non_exhaustive()
    }
}
