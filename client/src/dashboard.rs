use std::path::PathBuf;
use std::sync::Arc;

use futures::lock::Mutex;
use kernel::{CategoryFilter, FileId, FileStats, MediaFile};
use tokio::io::AsyncWrite;

use crate::api::StorageApi;
use crate::error::Result;
use crate::inventory::{FetchTicket, FileState, Inventory};
use crate::notice::{LogNotifier, Notice, Notify};
use crate::upload::{Batch, BatchSource, FileHandle, UploadTracker};

/// Asks the user to acknowledge an irreversible deletion.
///
/// Implementations block until the user answers.
pub trait Confirm {
    /// `file` is `None` when the id is not in the held list.
    fn confirm(&self, id: &FileId, file: Option<&MediaFile>) -> bool;
}

/// Confirms every deletion without asking.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _id: &FileId, _file: Option<&MediaFile>) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
}

/// File inventory and retention management for one user session.
///
/// Every user action issues exactly one remote call and then patches or
/// reloads the local inventory. Nothing is applied optimistically.
pub struct Dashboard<S> {
    api: S,
    inventory: Mutex<Inventory>,
    uploads: UploadTracker,
    notifier: Arc<dyn Notify>,
}

impl<S: StorageApi> Dashboard<S> {
    pub fn new(api: S) -> Self {
        Self {
            api,
            inventory: Mutex::new(Inventory::default()),
            uploads: UploadTracker::default(),
            notifier: Arc::new(LogNotifier),
        }
    }

    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notify>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Fetches inventory and stats as two independent round trips.
    pub async fn load(&self) -> Result<()> {
        let (files, stats) = futures::join!(self.refresh(), self.refresh_stats());
        files?;
        stats
    }

    /// Reloads the file list for the selected category.
    /// Returns `false` when a newer fetch superseded this one.
    pub async fn refresh(&self) -> Result<bool> {
        let ticket = self.inventory.lock().await.begin_fetch();
        self.fetch(ticket).await
    }

    pub async fn refresh_stats(&self) -> Result<()> {
        let ticket = self.inventory.lock().await.begin_stats();
        let stats = self.api.stats().await?;
        self.inventory.lock().await.complete_stats(ticket, stats);
        Ok(())
    }

    /// Switches the server side partition and fetches it.
    /// Returns `false` when a newer fetch superseded this one.
    pub async fn select_category(&self, filter: CategoryFilter) -> Result<bool> {
        tracing::debug!("selecting category {filter}");
        let ticket = self.inventory.lock().await.select_category(filter);
        self.fetch(ticket).await
    }

    /// Same as [`Dashboard::select_category`], by name: `all`, `images`,
    /// `videos`, `audios` or `documents`.
    pub async fn select_category_named(&self, name: &str) -> Result<bool> {
        let filter: CategoryFilter = name.parse()?;
        self.select_category(filter).await
    }

    /// Narrows the visible files. No network I/O.
    pub async fn search(&self, text: &str) {
        self.inventory.lock().await.set_search(text);
    }

    async fn fetch(&self, ticket: FetchTicket) -> Result<bool> {
        let result = self.api.list_files(ticket.filter()).await;
        let mut inventory = self.inventory.lock().await;
        match result {
            Ok(files) => Ok(inventory.complete_fetch(ticket, files)),
            Err(e) if !inventory.is_current(ticket) => {
                tracing::debug!("superseded file list for {} failed: {e}", ticket.filter());
                Ok(false)
            }
            Err(e) => {
                drop(inventory);
                tracing::error!("file list for {} not fetched: {e}", ticket.filter());
                self.notifier.notify(Notice::FetchFailed);
                Err(e)
            }
        }
    }

    /// Held files narrowed by the search text.
    pub async fn visible_files(&self) -> Vec<MediaFile> {
        self.inventory
            .lock()
            .await
            .visible()
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn files(&self) -> Vec<MediaFile> {
        self.inventory.lock().await.files().to_vec()
    }

    pub async fn stats(&self) -> Option<FileStats> {
        self.inventory.lock().await.stats().cloned()
    }

    pub async fn filter(&self) -> CategoryFilter {
        self.inventory.lock().await.filter()
    }

    pub async fn state(&self, id: &FileId) -> Option<FileState> {
        self.inventory.lock().await.state(id)
    }

    /// True while at least one upload batch is outstanding.
    pub fn uploading(&self) -> bool {
        self.uploads.uploading()
    }

    pub async fn storage_path(&self) -> Result<String> {
        self.api.storage_path().await
    }

    pub async fn download(
        &self,
        id: &FileId,
        sink: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> Result<u64> {
        self.api.download(id, sink).await
    }

    /// Uploads files chosen with a picker.
    pub async fn upload_from_picker(&self, paths: Vec<PathBuf>) -> Result<usize> {
        let handles = paths.into_iter().map(FileHandle::Path).collect();
        self.submit_batch(Batch::new(BatchSource::Picker, handles)?)
            .await
    }

    /// Uploads files dropped onto the dashboard.
    pub async fn upload_from_drop(&self, handles: Vec<FileHandle>) -> Result<usize> {
        self.submit_batch(Batch::new(BatchSource::Drop, handles)?)
            .await
    }

    /// Sends one batch as a single transfer, then reloads inventory and stats.
    /// Returns the number of files transferred.
    pub async fn submit_batch(&self, batch: Batch) -> Result<usize> {
        let count = batch.len();
        tracing::info!("uploading {count} file(s) from {:?}", batch.source());
        let result = {
            let _in_flight = self.uploads.begin();
            self.api.upload(batch).await
        };

        match result {
            Ok(()) => {
                self.notifier.notify(Notice::Uploaded(count));
                let (files, stats) = futures::join!(self.refresh(), self.refresh_stats());
                if let Err(e) = files {
                    tracing::warn!("inventory not reloaded after upload: {e}");
                }
                if let Err(e) = stats {
                    tracing::warn!("stats not reloaded after upload: {e}");
                }
                Ok(count)
            }
            Err(e) => {
                tracing::error!("upload of {count} file(s) failed: {e}");
                self.notifier.notify(Notice::UploadFailed);
                Err(e)
            }
        }
    }

    /// Asks the service to keep (`true`) or expire (`false`) a file and
    /// writes the value it confirms into that one record.
    pub async fn set_permanent(&self, id: &FileId, desired: bool) -> Result<bool> {
        self.inventory
            .lock()
            .await
            .mark(id, FileState::RetentionToggling);
        let result = self.api.set_permanent(id, desired).await;

        let mut inventory = self.inventory.lock().await;
        inventory.settle(id, FileState::RetentionToggling);
        match result {
            Ok(applied) => {
                if !inventory.patch_permanent(id, applied) {
                    tracing::debug!("file {id} not held locally, nothing to patch");
                }
                drop(inventory);
                if applied != desired {
                    tracing::info!("service kept file {id} permanent={applied}, requested {desired}");
                }
                self.notifier.notify(Notice::RetentionChanged {
                    id: id.clone(),
                    permanent: applied,
                });
                Ok(applied)
            }
            Err(e) => {
                drop(inventory);
                tracing::error!("retention of file {id} not changed: {e}");
                self.notifier
                    .notify(Notice::RetentionFailed { id: id.clone() });
                Err(e)
            }
        }
    }

    /// Deletes a file once `confirm` acknowledges it. The record leaves the
    /// local list only after the service confirms the removal.
    pub async fn delete_file(&self, id: &FileId, confirm: &dyn Confirm) -> Result<DeleteOutcome> {
        let file = self.inventory.lock().await.get(id).cloned();
        if !confirm.confirm(id, file.as_ref()) {
            tracing::debug!("deletion of file {id} cancelled");
            return Ok(DeleteOutcome::Cancelled);
        }

        self.inventory.lock().await.mark(id, FileState::Deleting);
        let result = self.api.delete(id).await;

        let mut inventory = self.inventory.lock().await;
        inventory.settle(id, FileState::Deleting);
        match result {
            Ok(()) => {
                inventory.remove(id);
                drop(inventory);
                tracing::info!("file {id} deleted");
                self.notifier.notify(Notice::Deleted { id: id.clone() });
                if let Err(e) = self.refresh_stats().await {
                    tracing::warn!("stats not reloaded after deletion: {e}");
                }
                Ok(DeleteOutcome::Deleted)
            }
            Err(e) => {
                drop(inventory);
                tracing::error!("file {id} not deleted: {e}");
                self.notifier.notify(Notice::DeleteFailed { id: id.clone() });
                Err(e)
            }
        }
    }

    /// Hands a file to the knowledge pipeline. Completion is not tracked,
    /// `processed` changes only on a later fetch.
    pub async fn request_knowledge_processing(&self, id: &FileId) -> Result<()> {
        self.inventory
            .lock()
            .await
            .mark(id, FileState::KnowledgeRequested);
        let result = self.api.process_knowledge(id).await;
        self.inventory.lock().await.settle(id, FileState::KnowledgeRequested);

        match result {
            Ok(()) => {
                self.notifier
                    .notify(Notice::ProcessingStarted { id: id.clone() });
                Ok(())
            }
            Err(e) => {
                tracing::error!("knowledge processing of file {id} not started: {e}");
                self.notifier
                    .notify(Notice::ProcessingFailed { id: id.clone() });
                Err(e)
            }
        }
    }
}
