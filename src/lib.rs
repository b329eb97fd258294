//! Case-folder synchronization for Google Drive
//!
//! Matches client names from a host page against Drive case folders, moves
//! the clients' documents into the matched folder, and advances that folder
//! from its intake parent to the processed parent. The host application
//! feeds page events in and paints the resulting statuses; everything
//! Drive-side lives here.
//!
//! # Architecture
//!
//! ```text
//! PageEvent ──▶ SyncSession ──▶ EventOutcome
//!                   │
//!     ┌─────────────┼──────────────┐
//!     ▼             ▼              ▼
//! FolderIndex  UploadEngine  FolderLifecycle
//!     └─────────────┼──────────────┘
//!                   ▼
//!       DriveApi (Drive v3 REST, tokens from TokenCache)
//! ```

pub mod config;
pub mod drive;
pub mod error;
pub mod events;
pub mod index;
pub mod lifecycle;
pub mod matcher;
pub mod session;
pub mod status;
pub mod token;
pub mod upload;

pub use config::{FolderGroup, GroupRole, SyncConfig};
pub use drive::{DriveApi, DriveFile, DriveHttpClient, FolderPage};
pub use error::SyncError;
pub use events::{EventOutcome, PageEvent};
pub use index::{FolderEntry, FolderIndex, IndexedGroup};
pub use lifecycle::FolderLifecycle;
pub use matcher::FolderMatch;
pub use session::SyncSession;
pub use status::ClientStatus;
pub use token::{
    FileTokenStore, MemoryTokenStore, ServiceAccountMinter, Token, TokenCache, TokenMinter,
    TokenStore,
};
pub use upload::{DocumentSource, FetchedDocument, HttpDocumentSource, UploadEngine};
