//! Folder lifecycle
//!
//! Advances a matched case folder from its intake parent to the processed
//! parent with a read-then-reparent sequence. Any failure reports `false`
//! and leaves the folder where it was; there is no retry.

use tracing::{info, warn};

use crate::drive::DriveApi;

pub struct FolderLifecycle<'a> {
    api: &'a dyn DriveApi,
    processed_parent: String,
}

impl<'a> FolderLifecycle<'a> {
    pub fn new(api: &'a dyn DriveApi, processed_parent: &str) -> Self {
        Self {
            api,
            processed_parent: processed_parent.to_string(),
        }
    }

    /// Move `folder_id` from its current first parent to the processed
    /// parent. The current parent is read immediately before the move; a
    /// folder reparented in between moves from whichever parent was read.
    pub async fn advance(&self, folder_id: &str) -> bool {
        let current = match self.api.file_parents(folder_id).await {
            Ok(parents) => match parents.into_iter().next() {
                Some(parent) => parent,
                None => {
                    warn!("Folder {} has no parent to move from", folder_id);
                    return false;
                }
            },
            Err(e) => {
                warn!("Could not read parents of {}: {}", folder_id, e);
                return false;
            }
        };

        if let Err(e) = self
            .api
            .move_file(folder_id, &self.processed_parent, &current)
            .await
        {
            warn!(
                "Could not move {} to {}: {}",
                folder_id, self.processed_parent, e
            );
            return false;
        }

        info!("Folder {} advanced to {}", folder_id, self.processed_parent);
        true
    }
}
