//! Error Types

use thiserror::Error;

/// Result type alias for membership operations
pub type Result<T> = std::result::Result<T, MembershipsError>;

/// Membership status and configuration errors
///
/// Render-time conditions (missing plan, wrong record kind, unpublished
/// plan, malformed id) are never errors; the renderer degrades to no
/// output instead. The entitlement gate never fails either - absence of
/// a qualifying signal means disabled.
#[derive(Error, Debug)]
pub enum MembershipsError {
    /// Connected user has no credential for the remote service
    #[error("Missing user token: reconnect this site to the remote service")]
    MissingToken,

    /// Remote service could not be reached (transport failure, timeout)
    #[error("Remote service unavailable: {0}")]
    RemoteUnavailable(String),

    /// Structured error surfaced by the remote service, passed through
    #[error("Remote error {code}: {message}")]
    Remote { code: String, message: String },

    /// Remote response violated the wire contract
    #[error("Malformed remote response: {0}")]
    DecodeFailure(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl MembershipsError {
    /// Stable error code for API payloads
    pub fn code(&self) -> &str {
        match self {
            MembershipsError::MissingToken => "missing_token",
            MembershipsError::RemoteUnavailable(_) => "remote_unavailable",
            MembershipsError::Remote { code, .. } => code,
            MembershipsError::DecodeFailure(_) => "decode_failure",
            MembershipsError::Config(_) => "invalid_config",
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, MembershipsError::RemoteUnavailable(_))
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            MembershipsError::MissingToken => {
                "Please connect your user account to the remote service.".into()
            }
            MembershipsError::RemoteUnavailable(_) => {
                "Could not reach the remote service. Please try again.".into()
            }
            MembershipsError::Remote { message, .. } => message.clone(),
            MembershipsError::DecodeFailure(_) => {
                "The remote service returned an unexpected response.".into()
            }
            MembershipsError::Config(msg) => format!("Configuration problem: {}", msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(MembershipsError::MissingToken.code(), "missing_token");
        assert_eq!(
            MembershipsError::RemoteUnavailable("timeout".into()).code(),
            "remote_unavailable"
        );

        let remote = MembershipsError::Remote {
            code: "upgrade_required".into(),
            message: "Upgrade your plan".into(),
        };
        assert_eq!(remote.code(), "upgrade_required");
        assert_eq!(remote.user_message(), "Upgrade your plan");
    }

    #[test]
    fn test_only_transport_failures_are_retryable() {
        assert!(MembershipsError::RemoteUnavailable("reset".into()).is_retryable());
        assert!(!MembershipsError::MissingToken.is_retryable());
        assert!(!MembershipsError::DecodeFailure("bad json".into()).is_retryable());
    }
}
