//! Folder index
//!
//! Paginated enumeration of the child folders of one Drive parent into a
//! name -> id mapping. Indices are built fresh per page session and never
//! persisted; a listing failure degrades to whatever was accumulated so far
//! instead of failing the caller.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::config::GroupRole;
use crate::drive::DriveApi;
use crate::matcher;

/// Ceiling on pagination rounds for one parent. A listing normally ends when
/// the API omits the next-page token; the ceiling ends it even if that never
/// happens.
const MAX_FOLDER_PAGES: usize = 64;

/// One indexed child folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderEntry {
    /// Folder name as returned by the API
    pub name: String,
    /// Precomputed comparable form of the name
    pub normalized: String,
    pub id: String,
}

/// Name -> id mapping of the child folders of one parent, kept in API
/// response order. A repeated name keeps its first position and takes the
/// last id seen.
#[derive(Debug, Clone, Default)]
pub struct FolderIndex {
    entries: Vec<FolderEntry>,
    positions: HashMap<String, usize>,
}

/// A named folder group: one index per configured parent, in the group's
/// declared parent order.
#[derive(Debug, Clone)]
pub struct IndexedGroup {
    pub name: String,
    pub role: GroupRole,
    pub indices: Vec<FolderIndex>,
}

impl FolderIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or update a name -> id entry.
    pub fn insert(&mut self, name: String, id: String) {
        match self.positions.get(&name) {
            Some(&pos) => self.entries[pos].id = id,
            None => {
                let normalized = matcher::normalize_name(&name);
                self.positions.insert(name.clone(), self.entries.len());
                self.entries.push(FolderEntry { name, normalized, id });
            }
        }
    }

    /// Look up a folder id by its exact raw name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.positions.get(name).map(|&pos| self.entries[pos].id.as_str())
    }

    pub fn entries(&self) -> &[FolderEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// List every child folder of `parent_id` into a fresh index.
    ///
    /// Pagination is sequential. A page-level error ends the walk with a
    /// warning and the entries accumulated so far stand as a partial result;
    /// zero folders is a legitimate empty index, not an error.
    pub async fn build(api: &dyn DriveApi, parent_id: &str) -> FolderIndex {
        let mut index = FolderIndex::new();
        let mut page_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = match api.list_child_folders(parent_id, page_token.as_deref()).await {
                Ok(page) => page,
                Err(e) => {
                    warn!("Folder listing under {} stopped early: {}", parent_id, e);
                    break;
                }
            };

            for folder in page.folders {
                index.insert(folder.name, folder.id);
            }

            pages += 1;
            match page.next_page_token {
                None => break,
                Some(_) if pages >= MAX_FOLDER_PAGES => {
                    warn!(
                        "Folder listing under {} still paginating after {} pages, keeping partial index",
                        parent_id, MAX_FOLDER_PAGES
                    );
                    break;
                }
                Some(token) => page_token = Some(token),
            }
        }

        debug!("Indexed {} folder(s) under {}", index.len(), parent_id);
        index
    }
}
