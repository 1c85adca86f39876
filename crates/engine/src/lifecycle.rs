//! Enable/disable lifecycle of the panel modifications.
//!
//! `enable` only schedules work: the panel theme is not reliably queryable
//! until the host has drawn once, so the real setup runs from a deferred
//! startup task carrying a [`StartupTicket`].  `disable` invalidates the
//! ticket, so a startup task that fires late does nothing.

use crate::events::EventEngine;
use crate::transitions::{Property, StyleValue, TransitionEngine};
use crate::{SharedApplier, SharedSettings};
use fade_config::SettingsStore;
use fade_core::{
    state::corner_for, DesktopSignal, FadeError, Result, Rgba, SignalHub, Variant, WindowSource,
};
use fade_theme::Foreground;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    #[default]
    Disabled,
    /// Enabled, waiting for the deferred startup task.
    Enabling,
    Enabled,
}

/// Identifies one scheduled startup.  Only the most recent ticket is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StartupTicket(u64);

/// Owns everything the panel modifications need between enable and disable.
pub struct Extension {
    state:       LifecycleState,
    generation:  u64,
    pending:     Option<StartupTicket>,
    modified:    bool,
    hub:         SignalHub,
    settings:    SharedSettings,
    desktop:     Rc<dyn WindowSource>,
    applier:     SharedApplier,
    transitions: Option<Rc<RefCell<TransitionEngine>>>,
    events:      Option<EventEngine>,
}

impl Extension {
    pub fn new(settings: SettingsStore, desktop: Rc<dyn WindowSource>, applier: SharedApplier) -> Self {
        Self {
            state: LifecycleState::Disabled,
            generation: 0,
            pending: None,
            modified: false,
            hub: SignalHub::new(),
            settings: Rc::new(RefCell::new(settings)),
            desktop,
            applier,
            transitions: None,
            events: None,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn hub(&self) -> &SignalHub {
        &self.hub
    }

    pub fn events(&self) -> Option<&EventEngine> {
        self.events.as_ref()
    }

    /// Start enabling.  The returned ticket must be handed to
    /// [`run_startup`](Self::run_startup) from a deferred task.
    pub fn enable(&mut self) -> Result<StartupTicket> {
        if self.state != LifecycleState::Disabled {
            warn!("enable() while {:?}; ignoring", self.state);
            return Err(FadeError::AlreadyActive);
        }

        let mut transitions = TransitionEngine::new(self.applier.clone());
        transitions.configure(&self.settings.borrow());
        self.transitions = Some(Rc::new(RefCell::new(transitions)));

        self.generation += 1;
        let ticket = StartupTicket(self.generation);
        self.pending = Some(ticket);
        self.state = LifecycleState::Enabling;
        debug!("Enabling; startup scheduled as {ticket:?}");
        Ok(ticket)
    }

    /// Body of the deferred startup task.
    pub fn run_startup(&mut self, ticket: StartupTicket) -> Result<()> {
        if self.pending != Some(ticket) || self.state != LifecycleState::Enabling {
            let err = match self.state {
                LifecycleState::Enabled => FadeError::AlreadyActive,
                _ => FadeError::Disabled,
            };
            warn!("Skipping startup {ticket:?}: {err}");
            return Err(err);
        }
        self.pending = None;

        let Some(transitions) = self.transitions.clone() else {
            return Err(FadeError::Disabled);
        };

        let theme = self.applier.borrow().theme_background();
        info!(
            "Panel theme background: rgb({}, {}, {}) at opacity {:.2}",
            theme.red, theme.green, theme.blue, theme.alpha
        );

        self.modify_panel(theme, &transitions);

        let mut events = EventEngine::new(
            self.settings.clone(),
            self.desktop.clone(),
            self.applier.clone(),
            transitions,
            theme,
        );
        let initialised = events.init(&mut self.hub);
        self.events = Some(events);

        match initialised {
            Ok(issued) => {
                self.state = LifecycleState::Enabled;
                info!("Panel modifications active ({issued} properties applied)");
                Ok(())
            }
            Err(e) => {
                warn!("Event engine failed to start: {e}");
                self.disable();
                Err(e)
            }
        }
    }

    /// Tear everything down.  Safe from any state and safe to repeat.
    pub fn disable(&mut self) {
        if let Some(ticket) = self.pending.take() {
            debug!("Cancelled pending startup {ticket:?}");
        }

        if let Some(mut events) = self.events.take() {
            events.cleanup(&mut self.hub);
        }
        if let Some(transitions) = self.transitions.take() {
            transitions.borrow_mut().cleanup();
        }
        if self.modified {
            self.unmodify_panel();
        }

        if self.state != LifecycleState::Disabled {
            info!("Panel modifications disabled");
        }
        self.state = LifecycleState::Disabled;
    }

    /// Deliver a desktop signal to the connected handlers.
    pub fn signal(&mut self, signal: &DesktopSignal) -> usize {
        self.hub.emit(signal)
    }

    /// Swap in freshly loaded settings and notify handlers of changed keys.
    pub fn reload_settings(&mut self, store: SettingsStore) -> Vec<String> {
        let changed = self.settings.borrow().diff(&store);
        *self.settings.borrow_mut() = store;

        for key in &changed {
            self.hub.emit(&DesktopSignal::SettingChanged(key.clone()));
        }
        changed
    }

    /// Advance running animations.  Returns `true` while more frames are needed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.transitions
            .as_ref()
            .is_some_and(|t| t.borrow_mut().tick(now))
    }

    pub fn is_animating(&self) -> bool {
        self.transitions
            .as_ref()
            .is_some_and(|t| t.borrow().is_animating())
    }

    fn modify_panel(&mut self, theme: Rgba, transitions: &RefCell<TransitionEngine>) {
        let settings = self.settings.borrow();
        {
            let mut applier = self.applier.borrow_mut();
            // Start from the theme colour so the panel does not flash.
            applier.set_panel_color(theme);
            applier.set_corner_color(corner_for(theme, settings.hide_corners()));
            applier.strip_panel_background();
            if settings.remove_panel_styling() {
                applier.strip_panel_styling();
            }
        }
        transitions
            .borrow_mut()
            .seed(Property::Background, StyleValue::Color(theme));
        self.modified = true;
    }

    fn unmodify_panel(&mut self) {
        let mut applier = self.applier.borrow_mut();
        applier.clear_panel_color();
        applier.clear_corner_color();
        applier.restore_panel_background();
        applier.restore_panel_styling();
        if applier.has_text_shadow() {
            applier.remove_text_shadow();
        }
        if applier.has_icon_shadow() {
            applier.remove_icon_shadow();
        }
        for target in Foreground::ALL {
            applier.remove_foreground(target, Variant::Normal);
            applier.remove_foreground(target, Variant::Maximized);
        }
        drop(applier);

        self.modified = false;
        debug!("Panel restored to its native style");
    }
}

impl std::fmt::Debug for Extension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extension")
            .field("state", &self.state)
            .field("pending", &self.pending)
            .field("modified", &self.modified)
            .field("hub", &self.hub)
            .finish_non_exhaustive()
    }
}
