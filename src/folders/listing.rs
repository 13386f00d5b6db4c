use crate::api::{Folder, FolderPage};
use crate::error::ApiError;

pub const LOAD_ERROR: &str = "Could not load folders. Please try again.";

/// Placeholder folders shown when the very first listing fails, so the
/// selector stays usable while the backend is unreachable.
pub fn fallback_folders() -> Vec<Folder> {
    [
        ("folder1", "Personal Documents"),
        ("folder2", "Contracts"),
        ("folder3", "Invoices"),
        ("folder4", "Reports"),
        ("folder5", "Projects"),
    ]
    .into_iter()
    .map(|(id, name)| Folder {
        id: id.to_string(),
        name: name.to_string(),
        path: format!("/{}", name),
    })
    .collect()
}

/// Folders accumulated across `GET /folders` pages.
#[derive(Debug, Default)]
pub struct FolderListing {
    folders: Vec<Folder>,
    cursor: Option<String>,
    has_more: bool,
    generation: u64,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl FolderListing {
    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Cursor for the next page, if the backend said there is one.
    pub fn next_cursor(&self) -> Option<&str> {
        if self.has_more {
            self.cursor.as_deref()
        } else {
            None
        }
    }

    pub fn begin_load(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    /// Marks a page request as in flight and returns the generation it
    /// belongs to. A first-page request starts a new generation, so pages
    /// still in flight for the old list are dropped when they arrive.
    pub fn begin_page(&mut self, continuation: bool) -> u64 {
        self.begin_load();
        if !continuation {
            self.generation += 1;
        }
        self.generation
    }

    fn is_stale(&self, generation: u64) -> bool {
        if generation == self.generation {
            return false;
        }
        tracing::debug!(
            generation,
            current = self.generation,
            "Dropping response for an outdated folder list"
        );
        true
    }

    /// A continuation page is appended; a first page replaces the list.
    pub fn apply_page(&mut self, page: FolderPage, continuation: bool, generation: u64) {
        if self.is_stale(generation) {
            return;
        }
        tracing::debug!(
            received = page.folders.len(),
            has_more = page.has_more,
            continuation,
            "Folder page received"
        );

        if continuation {
            self.folders.extend(page.folders);
        } else {
            self.folders = page.folders;
        }
        self.cursor = page.cursor;
        self.has_more = page.has_more;
        self.is_loading = false;
    }

    pub fn apply_failure(&mut self, err: &ApiError, generation: u64) {
        if self.is_stale(generation) {
            return;
        }
        tracing::warn!(error = %err, "Failed to load folders");
        self.is_loading = false;
        self.error = Some(LOAD_ERROR.to_string());
        if self.folders.is_empty() {
            self.folders = fallback_folders();
        }
    }
}
