use thiserror::Error;

/// Top-level error type used across the entire application.
#[derive(Debug, Error)]
pub enum FadeError {
    #[error("config error: {0}")]
    Config(String),

    #[error("IPC error: {0}")]
    Ipc(String),

    /// `enable()` or the deferred startup ran while the panel was already modified.
    #[error("panel modifications are already active")]
    AlreadyActive,

    /// A modification was attempted after `disable()`.
    #[error("tried to modify the panel while disabled")]
    Disabled,

    /// A handler fired while the engine was still busy resolving.
    #[error("re-entrant call into {0}")]
    Reentrant(&'static str),
}

pub type Result<T, E = FadeError> = std::result::Result<T, E>;
