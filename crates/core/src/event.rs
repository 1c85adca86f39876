/// Desktop events the panel engine reacts to.
///
/// Sources:
/// - Hyprland IPC socket   → `FocusChanged`, `MaximizeChanged`,
///   `WorkspaceSwitched`, `AppStateChanged`
/// - Config watcher task   → `SettingChanged`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesktopSignal {
    /// Keyboard focus moved to another window (or to none).
    FocusChanged,
    /// A window was maximized, unmaximized, or toggled fullscreen/floating.
    MaximizeChanged,
    /// Active workspace changed.
    WorkspaceSwitched,
    /// An application opened or closed a window.
    AppStateChanged,
    /// A setting changed.  Carries the settings key, e.g. `"maximized-opacity"`.
    SettingChanged(String),
}

impl DesktopSignal {
    pub fn kind(&self) -> SignalKind {
        match self {
            Self::FocusChanged => SignalKind::FocusChanged,
            Self::MaximizeChanged => SignalKind::MaximizeChanged,
            Self::WorkspaceSwitched => SignalKind::WorkspaceSwitched,
            Self::AppStateChanged => SignalKind::AppStateChanged,
            Self::SettingChanged(_) => SignalKind::SettingChanged,
        }
    }
}

/// Payload-free discriminant used as the subscription key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    FocusChanged,
    MaximizeChanged,
    WorkspaceSwitched,
    AppStateChanged,
    SettingChanged,
}

impl SignalKind {
    /// Every desktop signal that affects the resolved window context.
    pub const WINDOW: [SignalKind; 4] = [
        SignalKind::FocusChanged,
        SignalKind::MaximizeChanged,
        SignalKind::WorkspaceSwitched,
        SignalKind::AppStateChanged,
    ];
}
