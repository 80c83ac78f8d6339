use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use tokio::fs::File;
use tokio_util::io::ReaderStream;

use crate::error::{ClientError, Result};

/// Multipart field every file of a batch is sent under.
pub const FILES_FIELD: &str = "files";

/// Gesture a batch was gathered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchSource {
    Picker,
    Drop,
}

/// One raw file of a batch.
#[derive(Debug, Clone)]
pub enum FileHandle {
    /// File on local disk, streamed when the batch is sent
    Path(PathBuf),
    /// Content already held in memory
    Blob { name: String, data: Vec<u8> },
}

impl FileHandle {
    /// Name the file is submitted under.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            FileHandle::Path(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.to_string_lossy().into_owned()),
            FileHandle::Blob { name, .. } => name.clone(),
        }
    }

    async fn into_part(self) -> Result<Part> {
        let name = self.name();
        let mime = mime_guess::from_path(&name).first_or_octet_stream();
        let part = match self {
            FileHandle::Path(path) => {
                let f = File::open(&path).await?;
                let len = f.metadata().await?.len();
                let stream = reqwest::Body::wrap_stream(ReaderStream::new(f));
                Part::stream_with_length(stream, len)
            }
            FileHandle::Blob { data, .. } => Part::bytes(data),
        };
        Ok(part.file_name(name).mime_str(mime.essence_str())?)
    }
}

impl From<PathBuf> for FileHandle {
    fn from(path: PathBuf) -> Self {
        FileHandle::Path(path)
    }
}

/// Files gathered from a single gesture, sent together as one transfer.
#[derive(Debug, Clone)]
pub struct Batch {
    source: BatchSource,
    handles: Vec<FileHandle>,
}

impl Batch {
    /// Creates a batch. Content is not inspected, the storage service decides
    /// what it accepts.
    ///
    /// # Errors
    ///
    /// `ClientError::EmptyBatch` when `handles` is empty.
    pub fn new(source: BatchSource, handles: Vec<FileHandle>) -> Result<Self> {
        if handles.is_empty() {
            return Err(ClientError::EmptyBatch);
        }
        Ok(Self { source, handles })
    }

    #[must_use]
    pub fn source(&self) -> BatchSource {
        self.source
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.handles.iter().map(FileHandle::name).collect()
    }

    /// Packages every handle, in order, into one multipart form.
    pub async fn into_form(self) -> Result<Form> {
        let mut form = Form::new();
        for handle in self.handles {
            form = form.part(FILES_FIELD, handle.into_part().await?);
        }
        Ok(form)
    }
}

/// Tracks outstanding upload batches.
///
/// Concurrent gestures are not merged, queued or rejected: each one sends its
/// own request and holds a guard until that request settles. The indicator
/// stays on until the last outstanding batch settles.
#[derive(Debug, Clone, Default)]
pub struct UploadTracker {
    in_flight: Arc<AtomicUsize>,
}

impl UploadTracker {
    #[must_use]
    pub fn begin(&self) -> UploadGuard {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        UploadGuard {
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    #[must_use]
    pub fn uploading(&self) -> bool {
        self.in_flight() > 0
    }

    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

/// Marks one batch as in flight until dropped.
#[derive(Debug)]
pub struct UploadGuard {
    in_flight: Arc<AtomicUsize>,
}

impl Drop for UploadGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
