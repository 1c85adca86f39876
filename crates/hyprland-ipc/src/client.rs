use crate::events::{parse_event, ActiveWindowInfo, HyprlandEvent};
use fade_core::{FadeError, Result};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;
use tokio::sync::mpsc;
use tracing::{error, info, trace, warn};

/// Hyprland IPC client.
///
/// Connects to the Hyprland event socket and streams typed [`HyprlandEvent`]s.
/// Automatically reconnects if the socket connection drops.
#[derive(Debug, Clone)]
pub struct HyprlandIpc {
    /// Path to `.socket2.sock` (the event socket).
    event_socket: PathBuf,
    /// Path to `.socket.sock` (the command socket).
    cmd_socket:   PathBuf,
}

impl HyprlandIpc {
    /// Create a new client, discovering sockets from `$HYPRLAND_INSTANCE_SIGNATURE`.
    pub fn new() -> Result<Self> {
        let sig = std::env::var("HYPRLAND_INSTANCE_SIGNATURE").map_err(|_| {
            FadeError::Ipc("HYPRLAND_INSTANCE_SIGNATURE not set; is Hyprland running?".into())
        })?;

        let runtime_dir = std::env::var("XDG_RUNTIME_DIR")
            .unwrap_or_else(|_| "/run/user/1000".to_string());

        Ok(Self::at(PathBuf::from(runtime_dir).join("hypr").join(sig)))
    }

    /// Client for the sockets inside `dir`.
    pub fn at(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            event_socket: dir.join(".socket2.sock"),
            cmd_socket:   dir.join(".socket.sock"),
        }
    }

    pub fn event_socket(&self) -> &Path {
        &self.event_socket
    }

    /// Spawn a background task that reads from the Hyprland event socket and
    /// forwards typed [`HyprlandEvent`]s on the returned channel.
    ///
    /// Events the panel never reacts to are dropped here.  The task
    /// reconnects automatically on socket errors.
    pub fn spawn_listener(&self) -> mpsc::Receiver<HyprlandEvent> {
        let (tx, rx) = mpsc::channel(64);
        let path = self.event_socket.clone();

        tokio::spawn(async move {
            loop {
                match UnixStream::connect(&path).await {
                    Ok(stream) => {
                        info!("Connected to Hyprland event socket");
                        let mut lines = BufReader::new(stream).lines();

                        while let Ok(Some(line)) = lines.next_line().await {
                            let event = parse_event(&line);
                            if let HyprlandEvent::Unknown(raw) = &event {
                                trace!("Ignoring Hyprland event '{raw}'");
                                continue;
                            }
                            if tx.send(event).await.is_err() {
                                return; // all receivers dropped
                            }
                        }

                        warn!("Hyprland IPC connection lost; reconnecting in 2s");
                    }
                    Err(e) => {
                        error!("Cannot connect to Hyprland IPC: {e}; retrying in 2s");
                    }
                }

                tokio::time::sleep(tokio::time::Duration::from_secs(2)).await;
            }
        });

        rx
    }

    /// Send a one-shot command to Hyprland and return the raw response.
    pub async fn command(&self, cmd: &str) -> Result<String> {
        let mut stream = UnixStream::connect(&self.cmd_socket)
            .await
            .map_err(|e| FadeError::Ipc(format!("connect: {e}")))?;

        stream
            .write_all(cmd.as_bytes())
            .await
            .map_err(|e| FadeError::Ipc(format!("write: {e}")))?;

        let mut buf = String::new();
        stream
            .read_to_string(&mut buf)
            .await
            .map_err(|e| FadeError::Ipc(format!("read: {e}")))?;

        Ok(buf)
    }
}

/// Query the focused window via `hyprctl activewindow -j`.
///
/// Returns `Ok(None)` on an empty workspace.
pub async fn fetch_active_window(ipc: &HyprlandIpc) -> Result<Option<ActiveWindowInfo>> {
    let raw = ipc.command("j/activewindow").await?;
    parse_active_window(&raw)
}

fn parse_active_window(raw: &str) -> Result<Option<ActiveWindowInfo>> {
    let info: ActiveWindowInfo = serde_json::from_str(raw)
        .map_err(|e| FadeError::Ipc(format!("parse activewindow: {e}")))?;
    Ok(Some(info).filter(|i| !i.address.is_empty()))
}
