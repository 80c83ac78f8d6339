use core::fmt;

use kernel::FileId;

/// Transient, per action message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Uploaded(usize),
    UploadFailed,
    RetentionChanged { id: FileId, permanent: bool },
    RetentionFailed { id: FileId },
    Deleted { id: FileId },
    DeleteFailed { id: FileId },
    ProcessingStarted { id: FileId },
    ProcessingFailed { id: FileId },
    FetchFailed,
}

impl Notice {
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Notice::UploadFailed
                | Notice::RetentionFailed { .. }
                | Notice::DeleteFailed { .. }
                | Notice::ProcessingFailed { .. }
                | Notice::FetchFailed
        )
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Notice::Uploaded(1) => write!(f, "1 file uploaded"),
            Notice::Uploaded(n) => write!(f, "{n} files uploaded"),
            Notice::UploadFailed => write!(f, "Upload failed"),
            Notice::RetentionChanged {
                id,
                permanent: true,
            } => write!(f, "File {id} is now kept permanently"),
            Notice::RetentionChanged {
                id,
                permanent: false,
            } => write!(f, "File {id} will expire 7 days after upload"),
            Notice::RetentionFailed { id } => write!(f, "Could not change retention of file {id}"),
            Notice::Deleted { id } => write!(f, "File {id} deleted"),
            Notice::DeleteFailed { id } => write!(f, "Could not delete file {id}"),
            Notice::ProcessingStarted { id } => {
                write!(f, "Knowledge processing started for file {id}")
            }
            Notice::ProcessingFailed { id } => {
                write!(f, "Could not start knowledge processing for file {id}")
            }
            Notice::FetchFailed => write!(f, "Could not load files"),
        }
    }
}

/// Receives notices as actions settle.
pub trait Notify: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Routes notices into the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notify for LogNotifier {
    fn notify(&self, notice: Notice) {
        if notice.is_failure() {
            tracing::warn!("{notice}");
        } else {
            tracing::info!("{notice}");
        }
    }
}
