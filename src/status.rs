//! Client status
//!
//! Classification of a client row against the indexed folder groups. The
//! first three states come from matching alone; `AuthError` is added by the
//! session layer when no usable access token exists.

use serde::{Deserialize, Serialize};

use crate::index::IndexedGroup;
use crate::matcher;

/// Where a client's case folder currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClientStatus {
    /// No matching case folder anywhere
    NotEligible,
    /// Matching folder still under an intake parent
    Pending,
    /// Matching folder already under a processed parent
    Done,
    /// No usable access token, nothing could be checked
    AuthError,
}

impl std::fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientStatus::NotEligible => write!(f, "N/A"),
            ClientStatus::Pending => write!(f, "Pending"),
            ClientStatus::Done => write!(f, "Done"),
            ClientStatus::AuthError => write!(f, "Error"),
        }
    }
}

/// Classify one client name against the indexed groups. Intake groups are
/// checked before processed ones, so a client matched in both reads as
/// still pending.
pub fn classify(
    client_name: &str,
    intake: &[IndexedGroup],
    processed: &[IndexedGroup],
) -> ClientStatus {
    if matcher::resolve(client_name, intake).is_some() {
        ClientStatus::Pending
    } else if matcher::resolve(client_name, processed).is_some() {
        ClientStatus::Done
    } else {
        ClientStatus::NotEligible
    }
}
