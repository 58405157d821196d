//! Remote Status Client
//!
//! Versioned HTTP client for the remote membership status endpoint,
//! authenticated as the connected user.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use memberships_core::error::{MembershipsError, Result};
use memberships_core::model::ConnectionStatus;

/// REST namespace version for status requests
const API_VERSION: &str = "v2";

/// Remote service configuration
#[derive(Clone, Debug)]
pub struct RemoteConfig {
    /// Remote service base URL
    pub base_url: String,

    /// REST route base for membership status
    pub rest_base: String,

    /// Bearer token of the connected user, if any
    pub user_token: Option<String>,

    /// Per-request deadline in seconds
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8787".into(),
            rest_base: "memberships".into(),
            user_token: None,
            timeout_secs: 10,
        }
    }
}

impl RemoteConfig {
    pub fn from_env() -> Self {
        let base_url = std::env::var("MEMBERSHIPS_API_URL")
            .unwrap_or_else(|_| "http://localhost:8787".into());
        let rest_base =
            std::env::var("MEMBERSHIPS_REST_BASE").unwrap_or_else(|_| "memberships".into());
        let user_token = std::env::var("MEMBERSHIPS_USER_TOKEN").ok();
        let timeout_secs = std::env::var("MEMBERSHIPS_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(10);

        Self {
            base_url,
            rest_base,
            user_token,
            timeout_secs,
        }
    }
}

/// Fetches remote membership status for a site.
///
/// Implemented by the HTTP client and by test doubles.
#[async_trait]
pub trait StatusFetcher: Send + Sync {
    async fn fetch_status(&self, site_id: u64) -> Result<ConnectionStatus>;
}

/// Shape of a structured remote error body
#[derive(Debug, Deserialize)]
struct RemoteErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// HTTP client for the remote status endpoint
pub struct RemoteStatusClient {
    client: reqwest::Client,
    config: RemoteConfig,
}

impl RemoteStatusClient {
    pub fn new(config: RemoteConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::new(RemoteConfig::from_env())
    }

    fn status_url(&self, site_id: u64) -> String {
        format!(
            "{}/{}/sites/{}/{}/status",
            self.config.base_url.trim_end_matches('/'),
            API_VERSION,
            site_id,
            self.config.rest_base,
        )
    }

    /// Decode a status response body.
    ///
    /// Pure, so the wire contract is testable without a network. A non-2xx
    /// response surfaces the service's structured `{code, message}` error
    /// when the body carries one; anything else undecodable is a contract
    /// violation.
    pub fn parse_status_response(status: u16, body: &str) -> Result<ConnectionStatus> {
        if (200..300).contains(&status) {
            return serde_json::from_str(body)
                .map_err(|e| MembershipsError::DecodeFailure(e.to_string()));
        }

        match serde_json::from_str::<RemoteErrorBody>(body) {
            Ok(RemoteErrorBody {
                code: Some(code),
                message: Some(message),
            }) => Err(MembershipsError::Remote { code, message }),
            _ => Err(MembershipsError::DecodeFailure(format!(
                "HTTP {} without a structured error body",
                status
            ))),
        }
    }
}

#[async_trait]
impl StatusFetcher for RemoteStatusClient {
    async fn fetch_status(&self, site_id: u64) -> Result<ConnectionStatus> {
        let Some(token) = self.config.user_token.as_deref() else {
            return Err(MembershipsError::MissingToken);
        };

        let url = self.status_url(site_id);
        tracing::debug!(site_id, url = %url, "Requesting remote membership status");

        // One deadline covers the whole round trip; an elapsed deadline
        // must never hang the caller or leak a partial status.
        let deadline = Duration::from_secs(self.config.timeout_secs);
        let round_trip = async {
            let response = self.client.get(&url).bearer_auth(token).send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>((status, body))
        };

        let (status, body) = tokio::time::timeout(deadline, round_trip)
            .await
            .map_err(|_| {
                MembershipsError::RemoteUnavailable("status request timed out".into())
            })?
            .map_err(|e| MembershipsError::RemoteUnavailable(e.to_string()))?;

        Self::parse_status_response(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_url_is_versioned() {
        let client = RemoteStatusClient::new(RemoteConfig {
            base_url: "https://api.example.com/".into(),
            ..RemoteConfig::default()
        });

        assert_eq!(
            client.status_url(1234),
            "https://api.example.com/v2/sites/1234/memberships/status"
        );
    }

    #[test]
    fn test_parse_success_body() {
        let body = r#"{
            "products": [{"id": 7, "title": "Monthly", "price": "5.00", "currency": "USD"}],
            "connected_account_id": "acct_1",
            "connect_url": null,
            "should_upgrade_to_access_memberships": false
        }"#;

        let status = RemoteStatusClient::parse_status_response(200, body).unwrap();
        assert_eq!(status.products.len(), 1);
        assert_eq!(status.products[0].title, "Monthly");
        assert!(status.is_connected());
    }

    #[test]
    fn test_parse_malformed_success_body_is_decode_failure() {
        let result = RemoteStatusClient::parse_status_response(200, "not json");
        assert!(matches!(result, Err(MembershipsError::DecodeFailure(_))));
    }

    #[test]
    fn test_parse_structured_remote_error() {
        let body = r#"{"code": "upgrade_required", "message": "Upgrade your plan"}"#;
        let result = RemoteStatusClient::parse_status_response(403, body);

        match result {
            Err(MembershipsError::Remote { code, message }) => {
                assert_eq!(code, "upgrade_required");
                assert_eq!(message, "Upgrade your plan");
            }
            other => panic!("expected structured remote error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_unstructured_failure_is_decode_failure() {
        for body in ["", "<html>502</html>", r#"{"code": "x"}"#] {
            let result = RemoteStatusClient::parse_status_response(502, body);
            assert!(matches!(result, Err(MembershipsError::DecodeFailure(_))));
        }
    }

    #[tokio::test]
    async fn test_missing_token_short_circuits() {
        let client = RemoteStatusClient::new(RemoteConfig {
            user_token: None,
            ..RemoteConfig::default()
        });

        let result = client.fetch_status(1).await;
        assert!(matches!(result, Err(MembershipsError::MissingToken)));
    }
}
