pub mod error;
pub mod event;
pub mod signal;
pub mod state;

pub use error::{FadeError, Result};
pub use event::{DesktopSignal, SignalKind};
pub use signal::{HandlerId, SignalHub};
pub use state::{
    ForegroundColor, PanelAppearance, Rgb, Rgba, Shadow, Variant, WindowContext, WindowSource,
};
