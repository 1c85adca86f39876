pub mod easing;
pub mod events;
pub mod lifecycle;
pub mod resolve;
pub mod transitions;

#[cfg(test)]
mod testing;

use fade_config::SettingsStore;
use fade_theme::StyleApplier;
use std::cell::RefCell;
use std::rc::Rc;

pub use easing::Easing;
pub use events::{Connection, EventEngine};
pub use lifecycle::{Extension, LifecycleState, StartupTicket};
pub use resolve::{resolve, Resolution, Tier};
pub use transitions::{Property, StyleValue, TransitionEngine, TransitionRequest};

/// The panel surface, shared by every part of the engine.
pub type SharedApplier = Rc<RefCell<dyn StyleApplier>>;

pub type SharedSettings = Rc<RefCell<SettingsStore>>;
