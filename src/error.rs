//! Shared error type
//!
//! One taxonomy for the whole crate: authentication, Drive API rejections,
//! document download failures and folder resolution misses. Orchestration
//! layers flatten these to a boolean at the outermost boundary; everything
//! below returns the typed variant.

use thiserror::Error;

/// Crate-wide error type
#[derive(Error, Debug)]
pub enum SyncError {
    /// No usable credential, or the token mint/exchange was rejected
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Non-2xx response from a Drive endpoint
    #[error("Drive API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Transport-level failure before any HTTP status was received
    #[error("Network error: {0}")]
    Network(String),

    /// Source document unreachable or missing a usable filename
    #[error("Download failed: {0}")]
    Download(String),

    /// No folder matched the client name in any configured group
    #[error("No folder matched: {0}")]
    NoMatch(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SyncError {
    /// True when the failure is an authentication problem rather than a
    /// missing folder or a transfer fault. Hosts use this to decide between
    /// "check your credentials" and "this case is not handled here".
    pub fn is_auth(&self) -> bool {
        matches!(self, SyncError::Auth(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = SyncError::Api { status: 403, message: "rate limit".to_string() };
        assert_eq!(err.to_string(), "Drive API error 403: rate limit");

        let err = SyncError::NoMatch("Dupont".to_string());
        assert_eq!(err.to_string(), "No folder matched: Dupont");
    }

    #[test]
    fn test_is_auth() {
        assert!(SyncError::Auth("expired".to_string()).is_auth());
        assert!(!SyncError::Download("404".to_string()).is_auth());
    }
}
