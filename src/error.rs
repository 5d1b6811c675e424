use nix::errno::Errno;
use std::path::PathBuf;

/// Failure to enumerate mounted filesystems. Fatal at initialization.
#[derive(Debug, thiserror::Error)]
pub enum MountListError {
    /// The mount listing command could not be started.
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The command ran but exited unsuccessfully.
    #[error("{command} exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status:  String,
        stderr:  String,
    },

    /// A row of output could not be parsed.
    #[error("malformed mount row {line:?}: {reason}")]
    Malformed { line: String, reason: String },
}

/// Failure of a single statistics query. Never escapes a tick.
#[derive(Debug, thiserror::Error)]
pub enum StatError {
    /// The path is gone or no longer backed by a device (disk removal).
    #[error("{} unavailable: {errno}", .path.display())]
    Unavailable { path: PathBuf, errno: Errno },

    /// Any other statvfs failure.
    #[error("statvfs {} failed: {errno}", .path.display())]
    Os { path: PathBuf, errno: Errno },
}

impl StatError {
    /// Classify an errno returned by statvfs for `path`.
    pub fn from_errno(path: PathBuf, errno: Errno) -> Self {
        match errno {
            Errno::ENOENT | Errno::ENOTDIR | Errno::ESTALE | Errno::ENODEV | Errno::EIO => {
                StatError::Unavailable { path, errno }
            }
            _ => StatError::Os { path, errno },
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, StatError::Unavailable { .. })
    }
}

/// Failure delivering values to a metrics sink.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("sink I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The daemon answered with a negative status line.
    #[error("sink rejected value ({status}): {message}")]
    Rejected { status: i64, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum PollerError {
    /// A tick was requested before a successful initialization.
    #[error("poller is not initialized")]
    NotInitialized,

    #[error("mount enumeration failed: {0}")]
    MountList(#[from] MountListError),
}
