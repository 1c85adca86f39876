//! panelfade: a Hyprland panel whose background follows the focused window.
//!
//! Run with:  `RUST_LOG=info panelfade`

use anyhow::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Structured logging; RUST_LOG controls verbosity (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("panelfade v{} starting", env!("CARGO_PKG_VERSION"));

    fade_wayland::run().map_err(Into::into)
}
