//! Document transfer
//!
//! Pulls each linked document from its source and places it in a Drive
//! folder: filename from the Content-Disposition header, exact-name dedup
//! probe, then multipart upload. Strictly sequential; the first failure
//! aborts the remaining links and documents already transferred stay put.

use async_trait::async_trait;
use regex::Regex;
use tracing::{info, warn};

use crate::drive::DriveApi;
use crate::error::SyncError;

/// A downloaded document ready for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedDocument {
    pub filename: String,
    pub content: Vec<u8>,
}

/// Capability that fetches a linked document together with its filename
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedDocument, SyncError>;
}

/// Extract the filename parameter of a Content-Disposition header value,
/// stripping surrounding quotes and whitespace.
pub(crate) fn filename_from_disposition(value: &str) -> Option<String> {
    let re = Regex::new(r#"filename="?([^";]+)"?"#).ok()?;
    re.captures(value)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|name| !name.is_empty())
}

/// Plain HTTP document source. Links carry their own authorization, so
/// requests go out without credentials.
#[derive(Default)]
pub struct HttpDocumentSource {
    client: reqwest::Client,
}

impl HttpDocumentSource {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentSource for HttpDocumentSource {
    async fn fetch(&self, url: &str) -> Result<FetchedDocument, SyncError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SyncError::Download(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SyncError::Download(format!(
                "Document request failed: {}",
                response.status()
            )));
        }

        let disposition = response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string())
            .ok_or_else(|| {
                SyncError::Download("Missing Content-Disposition header".to_string())
            })?;

        let filename = filename_from_disposition(&disposition).ok_or_else(|| {
            SyncError::Download(format!("No filename in {:?}", disposition))
        })?;

        let content = response
            .bytes()
            .await
            .map_err(|e| SyncError::Download(e.to_string()))?;

        Ok(FetchedDocument {
            filename,
            content: content.to_vec(),
        })
    }
}

/// Moves a batch of linked documents into one Drive folder
pub struct UploadEngine<'a> {
    api: &'a dyn DriveApi,
    source: &'a dyn DocumentSource,
}

impl<'a> UploadEngine<'a> {
    pub fn new(api: &'a dyn DriveApi, source: &'a dyn DocumentSource) -> Self {
        Self { api, source }
    }

    /// Upload every linked document into `folder_id`, in order. A document
    /// whose exact name is already present in the folder is skipped and
    /// counts as success. The first failure stops the batch and reports
    /// `false`; documents uploaded before it are not rolled back.
    pub async fn upload_all(&self, links: &[String], folder_id: &str) -> bool {
        for link in links {
            if let Err(e) = self.upload_one(link, folder_id).await {
                warn!("Transfer aborted at {}: {}", link, e);
                return false;
            }
        }
        true
    }

    async fn upload_one(&self, link: &str, folder_id: &str) -> Result<(), SyncError> {
        let document = self.source.fetch(link).await?;

        if let Some(existing) = self
            .api
            .find_file_by_name(&document.filename, folder_id)
            .await?
        {
            info!("{} already in folder {}, skipping", existing.name, folder_id);
            return Ok(());
        }

        self.api
            .upload_file(&document.filename, &document.content, folder_id)
            .await?;
        Ok(())
    }
}
