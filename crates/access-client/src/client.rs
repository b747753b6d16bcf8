//! Cloudflare Access HTTP client (reqwest-based).

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::backend::AccessBackend;
use crate::error::{AccessClientError, AccessClientResult};
use crate::models::{AccessGroup, ApiEnvelope, GroupPage, TokenStatus};

/// Default Cloudflare API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

/// Client for the Access groups API of a single Cloudflare account.
#[derive(Debug, Clone)]
pub struct AccessClient {
    /// API base URL without trailing slash.
    base_url: String,
    /// Account that owns the Access groups.
    account_id: String,
    /// API token sent as a Bearer credential.
    api_token: String,
    http_client: Client,
}

impl AccessClient {
    /// Create a new client.
    pub fn new(
        base_url: impl Into<String>,
        account_id: impl Into<String>,
        api_token: impl Into<String>,
        timeout: Duration,
    ) -> AccessClientResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("access-scim-bridge/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                AccessClientError::InvalidConfig(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self::with_http_client(
            base_url,
            account_id,
            api_token,
            http_client,
        ))
    }

    /// Create a client with a pre-built `reqwest::Client` (for testing).
    #[must_use]
    pub fn with_http_client(
        base_url: impl Into<String>,
        account_id: impl Into<String>,
        api_token: impl Into<String>,
        http_client: Client,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            account_id: account_id.into(),
            api_token: api_token.into(),
            http_client,
        }
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Verify that the API token is valid and active.
    pub async fn verify_token(&self) -> AccessClientResult<TokenStatus> {
        let url = format!("{}/user/tokens/verify", self.base_url);
        let status: TokenStatus = self.get(&url).await?;
        if status.status != "active" {
            return Err(AccessClientError::Api {
                status: StatusCode::UNAUTHORIZED.as_u16(),
                message: format!("API token {} is {}", status.id, status.status),
            });
        }
        Ok(status)
    }

    fn groups_url(&self) -> String {
        format!(
            "{}/accounts/{}/access/groups",
            self.base_url, self.account_id
        )
    }

    fn group_url(&self, id: &str) -> String {
        format!("{}/{}", self.groups_url(), id)
    }

    // ── Internal HTTP Methods ─────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, url: &str) -> AccessClientResult<T> {
        debug!("Access GET {}", url);
        let response = self
            .http_client
            .get(url)
            .bearer_auth(&self.api_token)
            .send()
            .await?;
        let envelope = self.handle_response(response).await?;
        Self::into_result(envelope)
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> AccessClientResult<T> {
        debug!("Access POST {}", url);
        let response = self
            .http_client
            .post(url)
            .bearer_auth(&self.api_token)
            .json(body)
            .send()
            .await?;
        let envelope = self.handle_response(response).await?;
        Self::into_result(envelope)
    }

    async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> AccessClientResult<T> {
        debug!("Access PUT {}", url);
        let response = self
            .http_client
            .put(url)
            .bearer_auth(&self.api_token)
            .json(body)
            .send()
            .await?;
        let envelope = self.handle_response(response).await?;
        Self::into_result(envelope)
    }

    async fn delete(&self, url: &str) -> AccessClientResult<()> {
        debug!("Access DELETE {}", url);
        let response = self
            .http_client
            .delete(url)
            .bearer_auth(&self.api_token)
            .send()
            .await?;
        self.handle_response::<serde_json::Value>(response)
            .await
            .map(|_| ())
    }

    // ── Response Handling ─────────────────────────────────────────────

    fn into_result<T>(envelope: ApiEnvelope<T>) -> AccessClientResult<T> {
        envelope
            .result
            .ok_or_else(|| AccessClientError::ParseError("response has no result".to_string()))
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> AccessClientResult<ApiEnvelope<T>> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Self::error_from_body(status, &body));
        }

        let envelope: ApiEnvelope<T> = serde_json::from_str(&body)
            .map_err(|e| AccessClientError::ParseError(format!("Failed to parse response: {e}")))?;

        if !envelope.success {
            let message = envelope
                .error_message()
                .unwrap_or_else(|| "request was not successful".to_string());
            warn!(status = status.as_u16(), %message, "Access API reported failure");
            return Err(AccessClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(envelope)
    }

    fn error_from_body(status: StatusCode, body: &str) -> AccessClientError {
        let message = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(body)
            .ok()
            .and_then(|e| e.error_message())
            .unwrap_or_else(|| {
                if body.is_empty() {
                    format!("HTTP {status}")
                } else {
                    body.to_string()
                }
            });

        if status == StatusCode::NOT_FOUND {
            return AccessClientError::NotFound(message);
        }

        warn!(status = status.as_u16(), %message, "Access API request failed");
        AccessClientError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl AccessBackend for AccessClient {
    async fn list_groups(&self) -> AccessClientResult<GroupPage> {
        let url = self.groups_url();
        debug!("Access GET {}", url);
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await?;
        let envelope: ApiEnvelope<Vec<AccessGroup>> = self.handle_response(response).await?;

        Ok(GroupPage {
            result_info: envelope.result_info.unwrap_or_default(),
            groups: envelope.result.unwrap_or_default(),
        })
    }

    async fn get_group(&self, id: &str) -> AccessClientResult<AccessGroup> {
        self.get(&self.group_url(id)).await
    }

    async fn create_group(&self, group: &AccessGroup) -> AccessClientResult<AccessGroup> {
        self.post(&self.groups_url(), group).await
    }

    async fn update_group(&self, group: &AccessGroup) -> AccessClientResult<AccessGroup> {
        self.put(&self.group_url(&group.id), group).await
    }

    async fn delete_group(&self, id: &str) -> AccessClientResult<()> {
        self.delete(&self.group_url(id)).await
    }

    async fn revoke_user_tokens(&self, email: &str) -> AccessClientResult<()> {
        let url = format!(
            "{}/accounts/{}/access/organizations/revoke_user",
            self.base_url, self.account_id
        );
        let body = serde_json::json!({ "email": email });
        self.post::<serde_json::Value, _>(&url, &body)
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = AccessClient::with_http_client(
            "https://api.example.com/client/v4/",
            "acct",
            "token",
            Client::new(),
        );
        assert_eq!(client.base_url(), "https://api.example.com/client/v4");
        assert_eq!(
            client.group_url("g1"),
            "https://api.example.com/client/v4/accounts/acct/access/groups/g1"
        );
    }

    #[test]
    fn test_error_from_body_uses_envelope() {
        let body = r#"{"success":false,"errors":[{"code":12130,"message":"access.api.error.invalid_request"}],"messages":[],"result":null}"#;
        let err = AccessClient::error_from_body(StatusCode::BAD_REQUEST, body);
        match err {
            AccessClientError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "12130: access.api.error.invalid_request");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_error_from_body_not_found() {
        let err = AccessClient::error_from_body(StatusCode::NOT_FOUND, "");
        assert!(matches!(err, AccessClientError::NotFound(m) if m == "HTTP 404 Not Found"));
    }
}
