//! Host events
//!
//! The host page (content script, desktop shell, or test harness) talks to
//! the sync core through two channels: page events in, outcomes out. The
//! pump owns the session and handles one event at a time, so outcomes come
//! back in event order.

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::session::SyncSession;
use crate::status::ClientStatus;

/// What the host observed on the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    /// A page holding client rows was detected
    EligiblePage,
    /// The page identity changed in place; indices must not be reused
    Navigated,
    /// A client row appeared and needs a status
    RowAppeared { client_name: String },
    /// The operator asked to transfer a client's documents
    TransferRequested {
        client_name: String,
        links: Vec<String>,
    },
}

/// What the core reports back
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// Indices were rebuilt for a detected or re-identified page
    Refreshed,
    /// Status for one client row
    Status {
        client_name: String,
        status: ClientStatus,
    },
    /// End result of a requested transfer
    Transfer {
        client_name: String,
        succeeded: bool,
    },
}

/// Drive the session from a host event stream until the stream closes or
/// the outcome receiver goes away.
pub async fn run(
    mut session: SyncSession,
    mut events: mpsc::Receiver<PageEvent>,
    outcomes: mpsc::Sender<EventOutcome>,
) {
    while let Some(event) = events.recv().await {
        debug!("Page event: {:?}", event);

        let outcome = match event {
            PageEvent::EligiblePage | PageEvent::Navigated => {
                session.refresh().await;
                EventOutcome::Refreshed
            }
            PageEvent::RowAppeared { client_name } => {
                let status = session.classify(&client_name);
                EventOutcome::Status {
                    client_name,
                    status,
                }
            }
            PageEvent::TransferRequested { client_name, links } => {
                let succeeded = session.transfer(&client_name, &links).await;
                EventOutcome::Transfer {
                    client_name,
                    succeeded,
                }
            }
        };

        if outcomes.send(outcome).await.is_err() {
            info!("Outcome receiver dropped, stopping event pump");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FolderGroup, GroupRole, SyncConfig};
    use crate::drive::{DriveApi, DriveFile, FolderPage};
    use crate::error::SyncError;
    use crate::token::{MemoryTokenStore, Token, TokenCache, TokenMinter};
    use crate::upload::{DocumentSource, FetchedDocument};
    use async_trait::async_trait;
    use std::sync::Arc;

    /// One pending case folder under every parent; all mutations succeed.
    struct OneFolderApi;

    #[async_trait]
    impl DriveApi for OneFolderApi {
        async fn list_child_folders(
            &self,
            _parent_id: &str,
            _page_token: Option<&str>,
        ) -> Result<FolderPage, SyncError> {
            Ok(FolderPage {
                folders: vec![DriveFile {
                    id: "f0".to_string(),
                    name: "Vente DUPONT".to_string(),
                }],
                next_page_token: None,
            })
        }

        async fn find_file_by_name(
            &self,
            _name: &str,
            _folder_id: &str,
        ) -> Result<Option<DriveFile>, SyncError> {
            Ok(None)
        }

        async fn upload_file(
            &self,
            name: &str,
            _content: &[u8],
            _folder_id: &str,
        ) -> Result<DriveFile, SyncError> {
            Ok(DriveFile {
                id: "up".to_string(),
                name: name.to_string(),
            })
        }

        async fn file_parents(&self, _file_id: &str) -> Result<Vec<String>, SyncError> {
            Ok(vec!["p0".to_string()])
        }

        async fn move_file(
            &self,
            _file_id: &str,
            _add_parent: &str,
            _remove_parent: &str,
        ) -> Result<(), SyncError> {
            Ok(())
        }
    }

    struct NoSource;

    #[async_trait]
    impl DocumentSource for NoSource {
        async fn fetch(&self, url: &str) -> Result<FetchedDocument, SyncError> {
            Err(SyncError::Download(format!("no document at {}", url)))
        }
    }

    struct StaticMinter;

    #[async_trait]
    impl TokenMinter for StaticMinter {
        async fn mint(&self) -> Result<Token, SyncError> {
            Ok(Token {
                value: "tok".to_string(),
                expires_at: chrono::Utc::now().timestamp() + 1000,
            })
        }
    }

    async fn pump_session() -> SyncSession {
        let config = SyncConfig {
            groups: vec![
                FolderGroup {
                    name: "deeds".to_string(),
                    role: GroupRole::Intake,
                    parents: vec!["p0".to_string()],
                },
                FolderGroup {
                    name: "archived".to_string(),
                    role: GroupRole::Processed,
                    parents: vec!["p2".to_string()],
                },
            ],
            credentials_path: None,
            token_path: None,
        };
        let tokens = Arc::new(TokenCache::new(
            Box::new(MemoryTokenStore::new()),
            Box::new(StaticMinter),
        ));

        SyncSession::establish(config, tokens, Box::new(OneFolderApi), Box::new(NoSource))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_pump_answers_events_in_order() {
        let session = pump_session().await;
        let (event_tx, event_rx) = mpsc::channel(8);
        let (outcome_tx, mut outcome_rx) = mpsc::channel(8);

        let handle = tokio::spawn(run(session, event_rx, outcome_tx));

        event_tx
            .send(PageEvent::RowAppeared {
                client_name: "Dupont".to_string(),
            })
            .await
            .unwrap();
        event_tx
            .send(PageEvent::Navigated)
            .await
            .unwrap();
        event_tx
            .send(PageEvent::TransferRequested {
                client_name: "Dupont".to_string(),
                links: Vec::new(),
            })
            .await
            .unwrap();
        event_tx
            .send(PageEvent::RowAppeared {
                client_name: "Nobody Known".to_string(),
            })
            .await
            .unwrap();
        drop(event_tx);

        let mut got = Vec::new();
        while let Some(outcome) = outcome_rx.recv().await {
            got.push(outcome);
        }
        handle.await.unwrap();

        assert_eq!(
            got,
            vec![
                EventOutcome::Status {
                    client_name: "Dupont".to_string(),
                    status: ClientStatus::Pending,
                },
                EventOutcome::Refreshed,
                EventOutcome::Transfer {
                    client_name: "Dupont".to_string(),
                    succeeded: true,
                },
                EventOutcome::Status {
                    client_name: "Nobody Known".to_string(),
                    status: ClientStatus::NotEligible,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_pump_stops_when_outcome_receiver_drops() {
        let session = pump_session().await;
        let (event_tx, event_rx) = mpsc::channel(8);
        let (outcome_tx, outcome_rx) = mpsc::channel(8);

        let handle = tokio::spawn(run(session, event_rx, outcome_tx));

        drop(outcome_rx);
        event_tx.send(PageEvent::EligiblePage).await.unwrap();

        handle.await.unwrap();
    }
}
