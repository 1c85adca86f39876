use serde::Deserialize;

/// Events read from the Hyprland event socket (`socket2.sock`) that can
/// change how the panel should look.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HyprlandEvent {
    /// Focus moved.  Both fields are empty when nothing is focused.
    ActiveWindow { class: String, title: String },
    /// Fullscreen or maximize state of the active window.
    Fullscreen(bool),
    Workspace { id: i32, name: String },
    OpenWindow { address: String, class: String, title: String },
    CloseWindow { address: String },
    WindowTitle { address: String, title: Option<String> },
    ChangeFloatingMode { address: String, floating: bool },
    /// An event we don't react to; carries the raw line for debugging.
    Unknown(String),
}

impl HyprlandEvent {
    /// Whether the active window should be re-queried after this event.
    ///
    /// The event socket never reports the maximize state of a newly focused
    /// window, so focus and window-set changes are followed by a query.
    pub fn needs_refresh(&self) -> bool {
        matches!(
            self,
            HyprlandEvent::ActiveWindow { .. }
                | HyprlandEvent::Workspace { .. }
                | HyprlandEvent::OpenWindow { .. }
                | HyprlandEvent::CloseWindow { .. }
                | HyprlandEvent::ChangeFloatingMode { .. }
        )
    }
}

/// Fullscreen field of `hyprctl activewindow -j`: a flag on older Hyprland,
/// a mode (0 none, 1 maximized, 2 fullscreen) on newer releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FullscreenState {
    Flag(bool),
    Mode(u8),
}

impl Default for FullscreenState {
    fn default() -> Self {
        FullscreenState::Mode(0)
    }
}

impl FullscreenState {
    pub fn is_active(self) -> bool {
        match self {
            FullscreenState::Flag(flag) => flag,
            FullscreenState::Mode(mode) => mode != 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WorkspaceRef {
    pub id:   i32,
    pub name: String,
}

/// JSON shape returned by `hyprctl activewindow -j`.
///
/// Hyprland answers `{}` when nothing is focused, hence the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ActiveWindowInfo {
    pub address:    String,
    pub class:      String,
    pub title:      String,
    pub fullscreen: FullscreenState,
    pub floating:   bool,
    pub workspace:  WorkspaceRef,
}

/// Window address without the `0x` prefix.
///
/// The event socket sends bare hex (`55d8a1b2c3d0`) while `j/` queries
/// prefix it (`0x55d8a1b2c3d0`); both sides are compared in this form.
pub fn bare_address(address: &str) -> String {
    let address = address.trim();
    address
        .strip_prefix("0x")
        .unwrap_or(address)
        .to_ascii_lowercase()
}

/// Parse a raw IPC event line into a typed [`HyprlandEvent`].
///
/// Hyprland events have the format `event_name>>event_data`.
pub fn parse_event(line: &str) -> HyprlandEvent {
    let Some((event, data)) = line.split_once(">>") else {
        return HyprlandEvent::Unknown(line.to_string());
    };

    match event {
        "workspacev2" => {
            let (id, name) = data.split_once(',').unwrap_or((data, data));
            HyprlandEvent::Workspace {
                id:   id.trim().parse().unwrap_or(0),
                name: name.trim().to_string(),
            }
        }
        "workspace" => HyprlandEvent::Workspace {
            id:   data.trim().parse().unwrap_or(0),
            name: data.trim().to_string(),
        },
        "activewindow" => {
            let (class, title) = data.split_once(',').unwrap_or((data, ""));
            HyprlandEvent::ActiveWindow {
                class: class.trim().to_string(),
                title: title.trim().to_string(),
            }
        }
        "fullscreen" => HyprlandEvent::Fullscreen(data.trim() == "1"),
        "openwindow" => {
            // address,workspace,class,title
            let mut parts = data.splitn(4, ',');
            let address = bare_address(parts.next().unwrap_or(""));
            let _workspace = parts.next();
            HyprlandEvent::OpenWindow {
                address,
                class: parts.next().unwrap_or("").to_string(),
                title: parts.next().unwrap_or("").to_string(),
            }
        }
        "closewindow" => HyprlandEvent::CloseWindow { address: bare_address(data) },
        "windowtitle" => HyprlandEvent::WindowTitle {
            address: bare_address(data),
            title:   None,
        },
        "windowtitlev2" => {
            let (address, title) = data.split_once(',').unwrap_or((data, ""));
            HyprlandEvent::WindowTitle {
                address: bare_address(address),
                title:   Some(title.to_string()),
            }
        }
        "changefloatingmode" => {
            let (address, floating) = data.split_once(',').unwrap_or((data, "0"));
            HyprlandEvent::ChangeFloatingMode {
                address:  bare_address(address),
                floating: floating.trim() == "1",
            }
        }
        _ => HyprlandEvent::Unknown(line.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_workspacev2_event() {
        let event = parse_event("workspacev2>>3,coding");
        assert_eq!(event, HyprlandEvent::Workspace { id: 3, name: "coding".into() });
    }

    #[test]
    fn parse_active_window() {
        let event = parse_event("activewindow>>kitty,~/projects, with commas");
        assert_eq!(
            event,
            HyprlandEvent::ActiveWindow {
                class: "kitty".into(),
                title: "~/projects, with commas".into(),
            }
        );
        assert!(event.needs_refresh());
    }

    #[test]
    fn empty_active_window_means_nothing_focused() {
        let event = parse_event("activewindow>>,");
        assert_eq!(event, HyprlandEvent::ActiveWindow { class: String::new(), title: String::new() });
    }

    #[test]
    fn parse_open_window_keeps_commas_in_title() {
        let event = parse_event("openwindow>>80e62df0,2,firefox,Hello, world");
        assert_eq!(
            event,
            HyprlandEvent::OpenWindow {
                address: "80e62df0".into(),
                class:   "firefox".into(),
                title:   "Hello, world".into(),
            }
        );
    }

    #[test]
    fn parse_fullscreen_and_title() {
        assert_eq!(parse_event("fullscreen>>1"), HyprlandEvent::Fullscreen(true));
        assert_eq!(parse_event("fullscreen>>0"), HyprlandEvent::Fullscreen(false));
        assert_eq!(
            parse_event("windowtitlev2>>abc,New title"),
            HyprlandEvent::WindowTitle { address: "abc".into(), title: Some("New title".into()) }
        );
        assert!(!parse_event("fullscreen>>1").needs_refresh());
    }

    #[test]
    fn addresses_lose_their_prefix() {
        assert_eq!(bare_address("0x55D8A1B2C3D0"), "55d8a1b2c3d0");
        assert_eq!(bare_address("55d8a1b2c3d0"), "55d8a1b2c3d0");
        assert_eq!(
            parse_event("closewindow>>55d8a1b2c3d0"),
            HyprlandEvent::CloseWindow { address: "55d8a1b2c3d0".into() }
        );
    }

    #[test]
    fn parse_unknown_event() {
        let event = parse_event("somefutureevent>>data");
        assert!(matches!(event, HyprlandEvent::Unknown(_)));
    }

    #[test]
    fn active_window_json() {
        let info: ActiveWindowInfo = serde_json::from_str(
            r#"{"address":"0x1","class":"kitty","title":"~","fullscreen":1,"floating":false,
                "workspace":{"id":2,"name":"2"},"pid":42}"#,
        )
        .unwrap();
        assert!(info.fullscreen.is_active());
        assert_eq!(info.workspace.id, 2);

        let legacy: ActiveWindowInfo =
            serde_json::from_str(r#"{"address":"0x1","fullscreen":false}"#).unwrap();
        assert!(!legacy.fullscreen.is_active());

        let none: ActiveWindowInfo = serde_json::from_str("{}").unwrap();
        assert!(none.address.is_empty());
    }
}
