//! Google Drive HTTP client
//!
//! reqwest implementation of `DriveApi` against the Drive API v3, with
//! bearer tokens drawn from the shared token cache. Uploads use the
//! `multipart/related` endpoint with a base64-encoded content part.

use std::sync::Arc;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use tracing::info;

use super::{DriveApi, DriveFile, FolderPage};
use crate::error::SyncError;
use crate::token::TokenCache;

/// Google Drive API base URL
const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";
const UPLOAD_API_BASE: &str = "https://www.googleapis.com/upload/drive/v3";

/// Entries requested per folder-listing page
const FOLDER_PAGE_SIZE: u32 = 1000;

/// Fixed boundary for `uploadType=multipart` bodies
const UPLOAD_BOUNDARY: &str = "-------314159265358979323846";

/// Drive file list response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
    next_page_token: Option<String>,
}

/// Parents subset of file metadata
#[derive(Debug, Deserialize)]
struct FileParents {
    #[serde(default)]
    parents: Vec<String>,
}

/// Listing query for the non-trashed child folders of one parent
fn child_folder_query(parent_id: &str) -> String {
    format!(
        "'{}' in parents and mimeType='application/vnd.google-apps.folder' and trashed=false",
        parent_id
    )
}

/// Probe query for a non-trashed file with this exact name in one folder
fn name_probe_query(name: &str, folder_id: &str) -> String {
    format!(
        "'{}' in parents and name = '{}' and trashed = false",
        folder_id,
        name.replace("'", "\\'")
    )
}

/// Build a `multipart/related` upload body: a JSON metadata part naming the
/// destination folder, then the file content base64-encoded. MIME type is
/// guessed from the filename, falling back to PDF.
fn multipart_body(name: &str, content: &[u8], folder_id: &str) -> Vec<u8> {
    let mime_type = mime_guess::from_path(name)
        .first_raw()
        .unwrap_or("application/pdf");

    let metadata = serde_json::json!({
        "name": name,
        "mimeType": mime_type,
        "parents": [folder_id]
    });

    let mut body = Vec::new();
    body.extend_from_slice(format!("\r\n--{}\r\n", UPLOAD_BOUNDARY).as_bytes());
    body.extend_from_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
    body.extend_from_slice(metadata.to_string().as_bytes());
    body.extend_from_slice(format!("\r\n--{}\r\n", UPLOAD_BOUNDARY).as_bytes());
    body.extend_from_slice(format!("Content-Type: {}\r\n", mime_type).as_bytes());
    body.extend_from_slice(b"Content-Transfer-Encoding: base64\r\n\r\n");
    body.extend_from_slice(BASE64.encode(content).as_bytes());
    body.extend_from_slice(format!("\r\n--{}--", UPLOAD_BOUNDARY).as_bytes());
    body
}

/// Drive API v3 client
pub struct DriveHttpClient {
    client: reqwest::Client,
    tokens: Arc<TokenCache>,
}

impl DriveHttpClient {
    pub fn new(tokens: Arc<TokenCache>) -> Self {
        Self {
            client: reqwest::Client::new(),
            tokens,
        }
    }

    /// Get authorization header
    async fn auth_header(&self) -> Result<HeaderValue, SyncError> {
        let token = self.tokens.get_token(false).await?;
        HeaderValue::from_str(&format!("Bearer {}", token.value))
            .map_err(|e| SyncError::Auth(format!("Invalid token: {}", e)))
    }
}

#[async_trait]
impl DriveApi for DriveHttpClient {
    async fn list_child_folders(
        &self,
        parent_id: &str,
        page_token: Option<&str>,
    ) -> Result<FolderPage, SyncError> {
        let mut url = format!(
            "{}/files?q={}&fields={}&pageSize={}",
            DRIVE_API_BASE,
            urlencoding::encode(&child_folder_query(parent_id)),
            urlencoding::encode("nextPageToken, files(id, name)"),
            FOLDER_PAGE_SIZE
        );

        if let Some(token) = page_token {
            url.push_str(&format!("&pageToken={}", token));
        }

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, self.auth_header().await?)
            .send()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(SyncError::Api { status, message });
        }

        let list: FileList = response
            .json()
            .await
            .map_err(|e| SyncError::Parse(e.to_string()))?;

        Ok(FolderPage {
            folders: list.files,
            next_page_token: list.next_page_token,
        })
    }

    async fn find_file_by_name(
        &self,
        name: &str,
        folder_id: &str,
    ) -> Result<Option<DriveFile>, SyncError> {
        let url = format!(
            "{}/files?q={}&fields={}",
            DRIVE_API_BASE,
            urlencoding::encode(&name_probe_query(name, folder_id)),
            urlencoding::encode("files(id, name)")
        );

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, self.auth_header().await?)
            .send()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(SyncError::Api { status, message });
        }

        let list: FileList = response
            .json()
            .await
            .map_err(|e| SyncError::Parse(e.to_string()))?;

        Ok(list.files.into_iter().next())
    }

    async fn upload_file(
        &self,
        name: &str,
        content: &[u8],
        folder_id: &str,
    ) -> Result<DriveFile, SyncError> {
        let url = format!("{}/files?uploadType=multipart", UPLOAD_API_BASE);
        let body = multipart_body(name, content, folder_id);

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, self.auth_header().await?)
            .header(
                CONTENT_TYPE,
                format!("multipart/related; boundary=\"{}\"", UPLOAD_BOUNDARY),
            )
            .body(body)
            .send()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(SyncError::Api { status, message });
        }

        let file: DriveFile = response
            .json()
            .await
            .map_err(|e| SyncError::Parse(e.to_string()))?;

        info!("Uploaded {} to folder {}", file.name, folder_id);
        Ok(file)
    }

    async fn file_parents(&self, file_id: &str) -> Result<Vec<String>, SyncError> {
        let url = format!("{}/files/{}?fields=parents", DRIVE_API_BASE, file_id);

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, self.auth_header().await?)
            .send()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(SyncError::Api { status, message });
        }

        let meta: FileParents = response
            .json()
            .await
            .map_err(|e| SyncError::Parse(e.to_string()))?;

        Ok(meta.parents)
    }

    async fn move_file(
        &self,
        file_id: &str,
        add_parent: &str,
        remove_parent: &str,
    ) -> Result<(), SyncError> {
        let url = format!(
            "{}/files/{}?addParents={}&removeParents={}",
            DRIVE_API_BASE, file_id, add_parent, remove_parent
        );

        let response = self
            .client
            .patch(&url)
            .header(AUTHORIZATION, self.auth_header().await?)
            .send()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(SyncError::Api { status, message });
        }

        info!("Moved {} from {} to {}", file_id, remove_parent, add_parent);
        Ok(())
    }
}
