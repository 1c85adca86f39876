//! Minimal connect/disconnect signal hub.
//!
//! Handlers run in subscription order on the caller's thread.  A handler that
//! returns an error is logged and stays connected; the remaining handlers
//! still run.

use crate::{event::DesktopSignal, event::SignalKind, Result};
use std::fmt;
use tracing::warn;

/// Opaque id returned by [`SignalHub::connect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

type Callback = Box<dyn FnMut(&DesktopSignal) -> Result<()>>;

struct Handler {
    id:       HandlerId,
    kind:     SignalKind,
    callback: Callback,
}

/// Fans desktop signals out to connected handlers.
#[derive(Default)]
pub struct SignalHub {
    handlers: Vec<Handler>,
    next_id:  u64,
}

impl SignalHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect `callback` to every signal of `kind`.
    pub fn connect(
        &mut self,
        kind: SignalKind,
        callback: impl FnMut(&DesktopSignal) -> Result<()> + 'static,
    ) -> HandlerId {
        self.next_id += 1;
        let id = HandlerId(self.next_id);
        self.handlers.push(Handler {
            id,
            kind,
            callback: Box::new(callback),
        });
        id
    }

    /// Disconnect a handler.  Returns `false` if it was not connected.
    pub fn disconnect(&mut self, id: HandlerId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|h| h.id != id);
        self.handlers.len() != before
    }

    pub fn is_connected(&self, id: HandlerId) -> bool {
        self.handlers.iter().any(|h| h.id == id)
    }

    /// Number of connected handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Deliver `signal` to every handler connected to its kind.
    /// Returns how many handlers ran.
    pub fn emit(&mut self, signal: &DesktopSignal) -> usize {
        let kind = signal.kind();
        let mut fired = 0;
        for handler in self.handlers.iter_mut().filter(|h| h.kind == kind) {
            fired += 1;
            if let Err(e) = (handler.callback)(signal) {
                warn!("Handler {:?} for {kind:?} failed: {e}", handler.id);
            }
        }
        fired
    }
}

impl fmt::Debug for SignalHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalHub")
            .field("handlers", &self.handlers.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FadeError;
    use std::{cell::Cell, rc::Rc};

    #[test]
    fn emits_only_to_matching_kind() {
        let mut hub = SignalHub::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        hub.connect(SignalKind::FocusChanged, move |_| {
            h.set(h.get() + 1);
            Ok(())
        });

        assert_eq!(hub.emit(&DesktopSignal::FocusChanged), 1);
        assert_eq!(hub.emit(&DesktopSignal::WorkspaceSwitched), 0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn failing_handler_does_not_stop_others() {
        let mut hub = SignalHub::new();
        let hits = Rc::new(Cell::new(0));
        let failing = hub.connect(SignalKind::MaximizeChanged, |_| {
            Err(FadeError::Disabled)
        });
        let h = hits.clone();
        hub.connect(SignalKind::MaximizeChanged, move |_| {
            h.set(h.get() + 1);
            Ok(())
        });

        assert_eq!(hub.emit(&DesktopSignal::MaximizeChanged), 2);
        assert_eq!(hits.get(), 1);
        assert!(hub.is_connected(failing));
    }

    #[test]
    fn disconnect_removes_handler() {
        let mut hub = SignalHub::new();
        let id = hub.connect(SignalKind::AppStateChanged, |_| Ok(()));
        assert!(hub.disconnect(id));
        assert!(!hub.disconnect(id));
        assert!(hub.is_empty());
        assert_eq!(hub.emit(&DesktopSignal::AppStateChanged), 0);
    }
}
