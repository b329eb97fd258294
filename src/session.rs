//! Page session
//!
//! One `SyncSession` per page identity. It resolves the access token once,
//! builds one folder index per configured parent, and then serves
//! classification and transfer requests until the host navigates away and a
//! fresh session (or a `refresh`) replaces the indices. Indices are never
//! reused across page identities.

use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{info, warn};

use crate::config::{validate_config, GroupRole, SyncConfig};
use crate::drive::{DriveApi, DriveHttpClient};
use crate::error::SyncError;
use crate::index::{FolderIndex, IndexedGroup};
use crate::lifecycle::FolderLifecycle;
use crate::matcher::{self, FolderMatch};
use crate::status::{self, ClientStatus};
use crate::token::TokenCache;
use crate::upload::{DocumentSource, HttpDocumentSource, UploadEngine};

pub struct SyncSession {
    config: SyncConfig,
    tokens: Arc<TokenCache>,
    api: Box<dyn DriveApi>,
    source: Box<dyn DocumentSource>,
    processed_destination: String,
    auth_ok: bool,
    intake: Vec<IndexedGroup>,
    processed: Vec<IndexedGroup>,
}

impl SyncSession {
    /// Build a session for a freshly detected page: check the token once,
    /// then index every configured parent. An unusable token is recorded
    /// rather than propagated, so rows still render (as `AuthError`).
    pub async fn establish(
        config: SyncConfig,
        tokens: Arc<TokenCache>,
        api: Box<dyn DriveApi>,
        source: Box<dyn DocumentSource>,
    ) -> Result<Self, SyncError> {
        validate_config(&config)?;
        let processed_destination = config
            .processed_destination()
            .map(String::from)
            .ok_or_else(|| {
                SyncError::InvalidConfig("No processed group configured".to_string())
            })?;

        let mut session = Self {
            config,
            tokens,
            api,
            source,
            processed_destination,
            auth_ok: false,
            intake: Vec::new(),
            processed: Vec::new(),
        };
        session.rebuild().await;
        Ok(session)
    }

    /// Establish a session over the production stack, wired from the
    /// config's paths: file token store, service-account minter, HTTP Drive
    /// client, and HTTP document source.
    pub async fn from_config(config: SyncConfig) -> Result<Self, SyncError> {
        let tokens = Arc::new(TokenCache::from_config(&config)?);
        let api = Box::new(DriveHttpClient::new(tokens.clone()));
        let source = Box::new(HttpDocumentSource::new());
        Self::establish(config, tokens, api, source).await
    }

    /// Re-check the token and rebuild every folder index. Called on
    /// navigation, when the page identity changes under the session.
    pub async fn refresh(&mut self) {
        self.rebuild().await;
    }

    async fn rebuild(&mut self) {
        self.auth_ok = match self.tokens.get_token(false).await {
            Ok(_) => true,
            Err(e) => {
                warn!("Session has no usable token: {}", e);
                false
            }
        };

        let (intake, processed) = if self.auth_ok {
            build_indices(self.api.as_ref(), &self.config).await
        } else {
            empty_indices(&self.config)
        };

        self.intake = intake;
        self.processed = processed;

        info!(
            "Session ready: {} intake / {} processed group(s), auth {}",
            self.intake.len(),
            self.processed.len(),
            if self.auth_ok { "ok" } else { "failed" }
        );
    }

    pub fn auth_ok(&self) -> bool {
        self.auth_ok
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn intake_groups(&self) -> &[IndexedGroup] {
        &self.intake
    }

    pub fn processed_groups(&self) -> &[IndexedGroup] {
        &self.processed
    }

    /// Status of one client row.
    pub fn classify(&self, client_name: &str) -> ClientStatus {
        if !self.auth_ok {
            return ClientStatus::AuthError;
        }
        status::classify(client_name, &self.intake, &self.processed)
    }

    /// Find the intake case folder for a client. Reports an auth error when
    /// the session never had a usable token, a no-match error otherwise.
    pub fn resolve_intake(&self, client_name: &str) -> Result<FolderMatch, SyncError> {
        if let Some(found) = matcher::resolve(client_name, &self.intake) {
            return Ok(found);
        }
        if !self.auth_ok {
            return Err(SyncError::Auth(
                "No usable access token for this session".to_string(),
            ));
        }
        Err(SyncError::NoMatch(client_name.to_string()))
    }

    /// Upload the client's documents into their intake case folder, then
    /// advance the folder to the processed destination. Plain success or
    /// failure; the details are logged. A client with no links still gets
    /// their folder advanced.
    pub async fn transfer(&self, client_name: &str, links: &[String]) -> bool {
        let matched = match self.resolve_intake(client_name) {
            Ok(matched) => matched,
            Err(e) => {
                warn!("Cannot transfer for {}: {}", client_name, e);
                return false;
            }
        };

        info!(
            "Transferring {} document(s) for {} into {} (group {})",
            links.len(),
            client_name,
            matched.folder_name,
            matched.group
        );

        let engine = UploadEngine::new(self.api.as_ref(), self.source.as_ref());
        if !engine.upload_all(links, &matched.folder_id).await {
            return false;
        }

        FolderLifecycle::new(self.api.as_ref(), &self.processed_destination)
            .advance(&matched.folder_id)
            .await
    }
}

/// Index every parent of every group: parents concurrently, pagination
/// within one parent sequential.
async fn build_indices(
    api: &dyn DriveApi,
    config: &SyncConfig,
) -> (Vec<IndexedGroup>, Vec<IndexedGroup>) {
    let groups = join_all(config.groups.iter().map(|group| async move {
        let indices = join_all(
            group
                .parents
                .iter()
                .map(|parent| FolderIndex::build(api, parent)),
        )
        .await;

        IndexedGroup {
            name: group.name.clone(),
            role: group.role,
            indices,
        }
    }))
    .await;

    split_by_role(groups)
}

/// Empty indices mirroring the config structure, for sessions without auth.
fn empty_indices(config: &SyncConfig) -> (Vec<IndexedGroup>, Vec<IndexedGroup>) {
    let groups = config
        .groups
        .iter()
        .map(|group| IndexedGroup {
            name: group.name.clone(),
            role: group.role,
            indices: group.parents.iter().map(|_| FolderIndex::new()).collect(),
        })
        .collect();

    split_by_role(groups)
}

fn split_by_role(groups: Vec<IndexedGroup>) -> (Vec<IndexedGroup>, Vec<IndexedGroup>) {
    groups
        .into_iter()
        .partition(|g| g.role == GroupRole::Intake)
}
