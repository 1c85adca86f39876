pub mod registry;
pub mod store;
pub mod theme;
pub mod watcher;

pub use registry::{ChangeAction, SettingSpec, SettingValue, ShadowPosition, ValueType};
pub use store::{AppSettings, SettingsStore};
pub use theme::ThemeConfig;
pub use watcher::SettingsWatcher;

use fade_core::{FadeError, Result};
use std::path::{Path, PathBuf};

/// Load settings from a TOML file.  Returns `SettingsStore::default()` if the
/// file doesn't exist so the panel always has sensible defaults.
pub fn load(path: impl AsRef<Path>) -> Result<SettingsStore> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Settings file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(SettingsStore::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| FadeError::Config(format!("cannot read '{}': {e}", path.display())))?;

    raw.parse()
        .map_err(|e| FadeError::Config(format!("TOML parse error: {e}")))
}

/// Return the default settings path, honouring `$XDG_CONFIG_HOME`.
pub fn default_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("panelfade").join("panelfade.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let store = load("/definitely/not/here/panelfade.toml").unwrap();
        assert_eq!(store, SettingsStore::default());
    }

    #[test]
    fn loads_from_disk() {
        let path = std::env::temp_dir().join(format!("panelfade-load-{}.toml", std::process::id()));
        std::fs::write(&path, "maximized-opacity = 42\n").unwrap();
        let store = load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(store.maximized_opacity(), 42);
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let path = std::env::temp_dir().join(format!("panelfade-bad-{}.toml", std::process::id()));
        std::fs::write(&path, "maximized-opacity = = 1").unwrap();
        let result = load(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(FadeError::Config(_))));
    }
}
