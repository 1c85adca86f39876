use crate::SettingsStore;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Watches the settings file and sends a freshly parsed [`SettingsStore`]
/// after every write.
///
/// The parent directory is watched rather than the file itself so that the
/// file may be created after startup or replaced atomically by an editor.
/// A file that fails to parse is logged and skipped; the previous settings
/// stay in effect.
///
/// # Example
/// ```no_run
/// # async fn demo() {
/// use fade_config::SettingsWatcher;
/// let (_, mut rx) = SettingsWatcher::spawn("/home/user/.config/panelfade/panelfade.toml");
/// while let Some(store) = rx.recv().await {
///     println!("maximized opacity is now {}", store.maximized_opacity());
/// }
/// # }
/// ```
pub struct SettingsWatcher {
    path: PathBuf,
}

impl SettingsWatcher {
    /// Spawn a filesystem watcher for `path`.
    /// Returns the watcher handle and a receiver of reloaded settings.
    pub fn spawn(path: impl AsRef<Path>) -> (Self, mpsc::Receiver<SettingsStore>) {
        let (tx, rx) = mpsc::channel(1);
        let path = path.as_ref().to_path_buf();
        let watcher = Self { path: path.clone() };

        tokio::spawn(watch_loop(path, tx));

        (watcher, rx)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

async fn watch_loop(path: PathBuf, tx: mpsc::Sender<SettingsStore>) {
    use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
    use std::time::Duration;

    const SETTLE: Duration = Duration::from_millis(150);

    let Some(dir) = path.parent().map(Path::to_path_buf) else {
        error!("Settings path '{}' has no parent directory", path.display());
        return;
    };

    let (sync_tx, mut sync_rx) = mpsc::channel::<notify::Result<Event>>(16);

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = sync_tx.blocking_send(res);
        },
        Config::default().with_poll_interval(Duration::from_secs(2)),
    ) {
        Ok(w) => w,
        Err(e) => {
            error!("Failed to create filesystem watcher: {e}");
            return;
        }
    };

    if let Err(e) = watcher.watch(&dir, RecursiveMode::NonRecursive) {
        error!("Failed to watch '{}': {e}", dir.display());
        return;
    }

    info!("Watching settings file: {}", path.display());

    let mut last: Option<SettingsStore> = None;

    while let Some(event) = sync_rx.recv().await {
        if !touches(&event, &path) {
            continue;
        }

        // Editors often write several times per save; settle first.
        loop {
            match tokio::time::timeout(SETTLE, sync_rx.recv()).await {
                Ok(Some(_)) => continue,
                Ok(None) => return,
                Err(_elapsed) => break,
            }
        }

        let store = match crate::load(&path) {
            Ok(store) => store,
            Err(e) => {
                warn!("Settings reload failed, keeping previous values: {e}");
                continue;
            }
        };
        if last.as_ref() == Some(&store) {
            debug!("Settings file rewritten without changes");
            continue;
        }
        last = Some(store.clone());

        if tx.send(store).await.is_err() {
            break; // receiver dropped
        }
    }
}

fn touches(event: &notify::Result<notify::Event>, path: &Path) -> bool {
    use notify::EventKind::{Create, Modify, Remove};

    match event {
        Ok(e) => {
            matches!(e.kind, Modify(_) | Create(_) | Remove(_)) && e.paths.iter().any(|p| p == path)
        }
        Err(e) => {
            warn!("Watcher error: {e}");
            false
        }
    }
}
