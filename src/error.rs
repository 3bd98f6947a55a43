use std::io;
use thiserror::Error;

/// Custom error type for sysdash
#[derive(Error, Debug)]
pub enum SysdashError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Process {0} does not exist")]
    NoSuchProcess(u32),

    #[error("Failed to signal process: {0}")]
    ProcessSignal(String),

    #[error("Not supported on this platform: {0}")]
    Unsupported(String),

    #[error("Metric collection failed: {0}")]
    MetricCollection(String),

    #[error("TUI error: {0}")]
    Tui(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for sysdash
pub type Result<T> = std::result::Result<T, SysdashError>;

impl SysdashError {
    /// Create a permission denied error
    pub fn permission_denied<S: Into<String>>(msg: S) -> Self {
        SysdashError::PermissionDenied(msg.into())
    }

    pub fn process_signal<S: Into<String>>(msg: S) -> Self {
        SysdashError::ProcessSignal(msg.into())
    }

    pub fn unsupported<S: Into<String>>(msg: S) -> Self {
        SysdashError::Unsupported(msg.into())
    }

    pub fn metric_collection<S: Into<String>>(msg: S) -> Self {
        SysdashError::MetricCollection(msg.into())
    }

    pub fn tui<S: Into<String>>(msg: S) -> Self {
        SysdashError::Tui(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        SysdashError::Other(msg.into())
    }

    /// Whether the failure is the OS refusing access, as opposed to the
    /// target being gone or the call failing for another reason.
    pub fn is_permission_denied(&self) -> bool {
        match self {
            SysdashError::PermissionDenied(_) => true,
            SysdashError::Io(e) => e.kind() == io::ErrorKind::PermissionDenied,
            _ => false,
        }
    }
}
