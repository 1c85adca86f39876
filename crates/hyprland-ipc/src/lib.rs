pub mod client;
pub mod events;
pub mod model;

pub use client::{fetch_active_window, HyprlandIpc};
pub use events::{parse_event, ActiveWindowInfo, FullscreenState, HyprlandEvent};
pub use model::DesktopModel;
