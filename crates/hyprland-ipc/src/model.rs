//! Desktop state tracked from Hyprland events.

use crate::events::{bare_address, ActiveWindowInfo, HyprlandEvent};
use fade_core::{DesktopSignal, WindowContext, WindowSource};
use tracing::{debug, trace};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct FocusedWindow {
    /// Bare hex, see [`bare_address`].
    address:   Option<String>,
    class:     String,
    title:     String,
    maximized: bool,
}

impl FocusedWindow {
    fn same_window(&self, other: &FocusedWindow) -> bool {
        self.class == other.class && self.title == other.title
    }
}

/// Last known focus and workspace, kept current from the event stream and
/// from `activewindow` queries.
///
/// A focus event names the new window but not whether it is maximized, so
/// it is held back as `pending` until the follow-up query answers.  The
/// reported context only ever describes a fully known window.
#[derive(Debug, Clone, Default)]
pub struct DesktopModel {
    focused:   Option<FocusedWindow>,
    pending:   Option<FocusedWindow>,
    workspace: Option<i32>,
}

impl DesktopModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a focus change is waiting for its `activewindow` query.
    pub fn has_pending_focus(&self) -> bool {
        self.pending.is_some()
    }

    /// Fold one event into the model and report the matching desktop signal,
    /// if anything relevant changed.
    pub fn apply(&mut self, event: &HyprlandEvent) -> Option<DesktopSignal> {
        match event {
            HyprlandEvent::ActiveWindow { class, title } => {
                if class.is_empty() && title.is_empty() {
                    // Nothing focused: fully known, report right away.
                    self.pending = None;
                    return self.focused.take().map(|_| DesktopSignal::FocusChanged);
                }

                let next = FocusedWindow {
                    address:   None,
                    class:     class.clone(),
                    title:     title.clone(),
                    maximized: false,
                };
                if self.focused.as_ref().is_some_and(|f| f.same_window(&next)) {
                    self.pending = None;
                    return None;
                }
                debug!("Focus moved to '{class}'; waiting for its window state");
                self.pending = Some(next);
                None
            }
            HyprlandEvent::Fullscreen(active) => {
                if let Some(pending) = self.pending.as_mut() {
                    pending.maximized = *active;
                    return None;
                }
                let focused = self.focused.as_mut()?;
                if focused.maximized == *active {
                    return None;
                }
                focused.maximized = *active;
                Some(DesktopSignal::MaximizeChanged)
            }
            HyprlandEvent::Workspace { id, .. } => {
                if self.workspace == Some(*id) {
                    return None;
                }
                self.workspace = Some(*id);
                Some(DesktopSignal::WorkspaceSwitched)
            }
            HyprlandEvent::OpenWindow { .. } => Some(DesktopSignal::AppStateChanged),
            HyprlandEvent::CloseWindow { address } => {
                if self.is_focused(address) {
                    self.focused = None;
                }
                Some(DesktopSignal::AppStateChanged)
            }
            HyprlandEvent::WindowTitle { address, title: Some(title) } => {
                let focused = self
                    .focused
                    .as_mut()
                    .filter(|f| f.address.as_deref() == Some(address.as_str()))?;
                if focused.title == *title {
                    return None;
                }
                focused.title = title.clone();
                Some(DesktopSignal::FocusChanged)
            }
            HyprlandEvent::WindowTitle { title: None, .. }
            | HyprlandEvent::ChangeFloatingMode { .. }
            | HyprlandEvent::Unknown(_) => {
                trace!("No desktop signal for {event:?}");
                None
            }
        }
    }

    /// Replace the focused window with a fresh query result.
    pub fn sync(&mut self, info: Option<ActiveWindowInfo>) -> Option<DesktopSignal> {
        self.pending = None;
        let next = info.filter(|i| !i.address.is_empty()).map(|i| FocusedWindow {
            address:   Some(bare_address(&i.address)),
            class:     i.class,
            title:     i.title,
            maximized: i.fullscreen.is_active(),
        });
        self.replace_focus(next)
    }

    /// Accept a pending focus change as-is when its query cannot be answered.
    ///
    /// The maximize flag is whatever the event stream reported meanwhile,
    /// unmaximized otherwise.
    pub fn settle(&mut self) -> Option<DesktopSignal> {
        let pending = self.pending.take()?;
        self.replace_focus(Some(pending))
    }

    fn replace_focus(&mut self, next: Option<FocusedWindow>) -> Option<DesktopSignal> {
        let signal = match (&self.focused, &next) {
            (Some(a), Some(b)) if a.same_window(b) => {
                (a.maximized != b.maximized).then_some(DesktopSignal::MaximizeChanged)
            }
            (None, None) => None,
            _ => Some(DesktopSignal::FocusChanged),
        };

        self.focused = next;
        signal
    }

    fn is_focused(&self, address: &str) -> bool {
        self.focused
            .as_ref()
            .and_then(|f| f.address.as_deref())
            .is_some_and(|a| a == address)
    }
}

impl WindowSource for DesktopModel {
    fn window_context(&self) -> WindowContext {
        match &self.focused {
            Some(f) => WindowContext {
                is_maximized: f.maximized,
                app_id:       Some(f.class.clone()).filter(|c| !c.is_empty()),
                window_title: Some(f.title.clone()).filter(|t| !t.is_empty()),
            },
            None => WindowContext::default(),
        }
    }
}
