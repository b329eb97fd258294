//! Sync configuration
//!
//! Folder groups and credential locations, persisted as JSON in the user
//! config directory. Groups are matched in their declared order, which makes
//! matching priority explicit in the config file instead of implied by
//! numbering.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::error::SyncError;

/// Which side of the lifecycle a folder group holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupRole {
    /// Case folders still awaiting documents
    Intake,
    /// Case folders already handled
    Processed,
}

/// A named set of Drive parent folders searched as one unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderGroup {
    /// Display name, unique within the config
    pub name: String,
    pub role: GroupRole,
    /// Drive folder ids whose children are indexed, in search order
    pub parents: Vec<String>,
}

/// Sync configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Folder groups in matching priority order
    pub groups: Vec<FolderGroup>,
    /// Service-account JSON key file; None leaves token minting to the host
    #[serde(default)]
    pub credentials_path: Option<PathBuf>,
    /// Token cache file; None uses the default under the config directory
    #[serde(default)]
    pub token_path: Option<PathBuf>,
}

impl SyncConfig {
    /// Groups holding the given role, in declared order.
    pub fn groups_with_role(&self, role: GroupRole) -> impl Iterator<Item = &FolderGroup> {
        self.groups.iter().filter(move |g| g.role == role)
    }

    /// Destination for advanced folders: the first parent of the first
    /// processed group.
    pub fn processed_destination(&self) -> Option<&str> {
        self.groups_with_role(GroupRole::Processed)
            .next()
            .and_then(|g| g.parents.first())
            .map(|p| p.as_str())
    }
}

/// Get the path to the sync config file
fn get_config_path() -> PathBuf {
    let config_dir = dirs::config_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")));
    config_dir.join("dossier-sync").join("config.json")
}

/// Load the sync configuration from disk, falling back to the default
pub fn load_config() -> SyncConfig {
    let config_path = get_config_path();

    if config_path.exists() {
        match fs::read_to_string(&config_path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to parse sync config: {}", e);
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read sync config: {}", e);
            }
        }
    }

    SyncConfig::default()
}

/// Save the sync configuration to disk
pub fn save_config(config: &SyncConfig) -> Result<(), SyncError> {
    let config_path = get_config_path();

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(config)
        .map_err(|e| SyncError::Parse(format!("Failed to serialize config: {}", e)))?;

    fs::write(&config_path, content)?;

    tracing::info!("Sync config saved to {:?}", config_path);
    Ok(())
}

/// Validate a sync configuration
pub fn validate_config(config: &SyncConfig) -> Result<(), SyncError> {
    if config.groups.is_empty() {
        return Err(SyncError::InvalidConfig(
            "No folder groups configured".to_string(),
        ));
    }

    let mut seen = std::collections::HashSet::new();
    for group in &config.groups {
        if group.name.is_empty() {
            return Err(SyncError::InvalidConfig(
                "Folder group without a name".to_string(),
            ));
        }
        if !seen.insert(group.name.as_str()) {
            return Err(SyncError::InvalidConfig(format!(
                "Duplicate folder group: {}",
                group.name
            )));
        }
        if group.parents.is_empty() {
            return Err(SyncError::InvalidConfig(format!(
                "Folder group {} has no parent folders",
                group.name
            )));
        }
        if group.parents.iter().any(|p| p.is_empty()) {
            return Err(SyncError::InvalidConfig(format!(
                "Folder group {} has an empty parent id",
                group.name
            )));
        }
    }

    if config.groups_with_role(GroupRole::Intake).next().is_none() {
        return Err(SyncError::InvalidConfig(
            "No intake group configured".to_string(),
        ));
    }
    if config.processed_destination().is_none() {
        return Err(SyncError::InvalidConfig(
            "No processed group configured".to_string(),
        ));
    }

    Ok(())
}
