use std::collections::HashMap;

use kernel::{CategoryFilter, FileId, FileStats, MediaFile};

use crate::search;

/// What the dashboard is currently doing with a listed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    Listed,
    RetentionToggling,
    Deleting,
    KnowledgeRequested,
}

/// Issued for every inventory fetch. Only the ticket of the most recent
/// fetch can replace the held list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    filter: CategoryFilter,
}

impl FetchTicket {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn filter(&self) -> CategoryFilter {
        self.filter
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsTicket {
    generation: u64,
}

/// Session local cache of the last fetched file list and usage stats.
#[derive(Debug, Default)]
pub struct Inventory {
    files: Vec<MediaFile>,
    stats: Option<FileStats>,
    filter: CategoryFilter,
    search: String,
    issued: u64,
    stats_issued: u64,
    /// Actions in flight per file, most recent last
    pending: HashMap<FileId, Vec<FileState>>,
}

impl Inventory {
    #[must_use]
    pub fn filter(&self) -> CategoryFilter {
        self.filter
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    #[must_use]
    pub fn files(&self) -> &[MediaFile] {
        &self.files
    }

    #[must_use]
    pub fn stats(&self) -> Option<&FileStats> {
        self.stats.as_ref()
    }

    #[must_use]
    pub fn get(&self, id: &FileId) -> Option<&MediaFile> {
        self.files.iter().find(|f| &f.id == id)
    }

    /// Held files narrowed by the current search text.
    #[must_use]
    pub fn visible(&self) -> Vec<&MediaFile> {
        search::filtered(&self.files, &self.search)
    }

    pub fn set_search(&mut self, text: &str) {
        text.clone_into(&mut self.search);
    }

    /// Switches the server side partition and issues the fetch for it.
    pub fn select_category(&mut self, filter: CategoryFilter) -> FetchTicket {
        self.filter = filter;
        self.begin_fetch()
    }

    /// Issues a fetch for the current partition, superseding any fetch
    /// still in flight.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        FetchTicket {
            generation: self.issued,
            filter: self.filter,
        }
    }

    /// True while no later fetch has been issued.
    #[must_use]
    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.generation == self.issued
    }

    /// Replaces the held list when `ticket` is the latest issued.
    /// Returns `false` and leaves everything untouched for superseded fetches.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, files: Vec<MediaFile>) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(
                "discarding stale file list: generation {} filter {}, latest is {}",
                ticket.generation,
                ticket.filter,
                self.issued
            );
            return false;
        }
        self.files = files;
        let files = &self.files;
        self.pending
            .retain(|id, _| files.iter().any(|f| &f.id == id));
        true
    }

    pub fn begin_stats(&mut self) -> StatsTicket {
        self.stats_issued += 1;
        StatsTicket {
            generation: self.stats_issued,
        }
    }

    pub fn complete_stats(&mut self, ticket: StatsTicket, stats: FileStats) -> bool {
        if ticket.generation != self.stats_issued {
            tracing::debug!(
                "discarding stale stats: generation {}, latest is {}",
                ticket.generation,
                self.stats_issued
            );
            return false;
        }
        self.stats = Some(stats);
        true
    }

    /// Writes the retention flag the service confirmed into the one matching
    /// record. Returns `false` when no such record is held.
    pub fn patch_permanent(&mut self, id: &FileId, is_permanent: bool) -> bool {
        match self.files.iter_mut().find(|f| &f.id == id) {
            Some(file) => {
                file.is_permanent = is_permanent;
                true
            }
            None => false,
        }
    }

    /// Drops every record with `id`. Returns `false` when none was held.
    pub fn remove(&mut self, id: &FileId) -> bool {
        let before = self.files.len();
        self.files.retain(|f| &f.id != id);
        self.pending.remove(id);
        self.files.len() != before
    }

    pub fn mark(&mut self, id: &FileId, state: FileState) {
        self.pending.entry(id.clone()).or_default().push(state);
    }

    /// Ends one action started with [`Inventory::mark`]. Other actions still
    /// in flight on the same file keep their state.
    pub fn settle(&mut self, id: &FileId, state: FileState) {
        if let Some(states) = self.pending.get_mut(id) {
            if let Some(pos) = states.iter().rposition(|s| *s == state) {
                states.remove(pos);
            }
            if states.is_empty() {
                self.pending.remove(id);
            }
        }
    }

    /// `None` once the record is gone from the held list.
    #[must_use]
    pub fn state(&self, id: &FileId) -> Option<FileState> {
        self.get(id)?;
        let latest = self.pending.get(id).and_then(|states| states.last());
        Some(latest.copied().unwrap_or(FileState::Listed))
    }
}
