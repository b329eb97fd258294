//! Drive access
//!
//! `DriveApi` is the seam between the sync flow and the Google Drive v3 REST
//! API; `DriveHttpClient` is the production implementation. Keeping the seam
//! a trait lets every consumer be exercised against scripted fakes.

pub mod http;

pub use self::http::DriveHttpClient;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::SyncError;

/// File or folder metadata subset used by the sync flow
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    pub name: String,
}

/// One page of a child-folder listing
#[derive(Debug, Clone)]
pub struct FolderPage {
    pub folders: Vec<DriveFile>,
    pub next_page_token: Option<String>,
}

/// Drive operations needed by the sync flow
#[async_trait]
pub trait DriveApi: Send + Sync {
    /// List one page of the non-trashed child folders of `parent_id`.
    async fn list_child_folders(
        &self,
        parent_id: &str,
        page_token: Option<&str>,
    ) -> Result<FolderPage, SyncError>;

    /// Find a non-trashed file named exactly `name` directly under `folder_id`.
    async fn find_file_by_name(
        &self,
        name: &str,
        folder_id: &str,
    ) -> Result<Option<DriveFile>, SyncError>;

    /// Upload `content` as a new file named `name` under `folder_id`.
    async fn upload_file(
        &self,
        name: &str,
        content: &[u8],
        folder_id: &str,
    ) -> Result<DriveFile, SyncError>;

    /// Current parent folder ids of `file_id`.
    async fn file_parents(&self, file_id: &str) -> Result<Vec<String>, SyncError>;

    /// Reparent `file_id` from `remove_parent` to `add_parent`.
    async fn move_file(
        &self,
        file_id: &str,
        add_parent: &str,
        remove_parent: &str,
    ) -> Result<(), SyncError>;
}
