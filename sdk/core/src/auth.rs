//! Credentials for the management plane.
//!
//! Azure Stack deployments authenticate service principals against an AAD
//! (or ADFS) v1 token endpoint, exchanging a tenant, client id and client
//! secret for a bearer token scoped to a resource identifier.

use async_trait::async_trait;
use serde::Deserialize;
use time::{Duration, OffsetDateTime};

use crate::{Error, ErrorKind, Result};

/// A bearer token. The token text is only reachable through
/// [`AccessToken::secret`] and never shows up in `Debug` output.
#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(..)")
    }
}

/// The outcome of a token request.
#[derive(Clone, Debug)]
pub struct TokenResponse {
    pub token: AccessToken,
    pub expires_on: OffsetDateTime,
}

/// Something that can produce bearer tokens for a resource.
#[async_trait]
pub trait TokenCredential: Send + Sync {
    /// Get a token scoped to `resource` (the token audience URI).
    async fn get_token(&self, resource: &str) -> Result<TokenResponse>;
}

/// Authenticates with a client id and secret through the OAuth 2.0 client
/// credentials flow against a v1 token endpoint
/// (`{authority}/{tenant}/oauth2/token` with a `resource` parameter).
///
/// The authority URL is caller-supplied so that both Azure AD and the ADFS
/// endpoint of a disconnected Azure Stack work.
pub struct ClientSecretCredential {
    authority: String,
    tenant_id: String,
    client_id: String,
    client_secret: String,
    http: reqwest::Client,
}

impl ClientSecretCredential {
    pub fn new(
        authority: impl Into<String>,
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            authority: authority.into(),
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            http: reqwest::Client::new(),
        }
    }

    fn token_endpoint(&self) -> String {
        format!(
            "{}/{}/oauth2/token",
            self.authority.trim_end_matches('/'),
            self.tenant_id
        )
    }
}

#[derive(Deserialize)]
struct AadTokenResponse {
    access_token: String,
    #[serde(default, deserialize_with = "deserialize_seconds")]
    expires_in: Option<i64>,
}

/// AAD v1 reports `expires_in` as a decimal string; ADFS as a number.
fn deserialize_seconds<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Seconds {
        Number(i64),
        Text(String),
    }

    match Option::<Seconds>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Seconds::Number(n)) => Ok(Some(n)),
        Some(Seconds::Text(s)) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[async_trait]
impl TokenCredential for ClientSecretCredential {
    async fn get_token(&self, resource: &str) -> Result<TokenResponse> {
        let endpoint = self.token_endpoint();
        log::debug!("requesting token from {endpoint} for resource {resource}");

        let response = self
            .http
            .post(&endpoint)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", &self.client_id),
                ("client_secret", &self.client_secret),
                ("resource", resource),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::message(
                ErrorKind::Credential,
                format!("token request failed with status {status}: {body}"),
            ));
        }

        let token: AadTokenResponse = response.json().await?;
        let expires_on =
            OffsetDateTime::now_utc() + Duration::seconds(token.expires_in.unwrap_or(0));
        Ok(TokenResponse {
            token: AccessToken::new(token.access_token),
            expires_on,
        })
    }
}

/// Wraps a token that was acquired out of band.
pub struct BearerTokenCredential(AccessToken);

impl BearerTokenCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(AccessToken::new(token))
    }
}

#[async_trait]
impl TokenCredential for BearerTokenCredential {
    async fn get_token(&self, _resource: &str) -> Result<TokenResponse> {
        Ok(TokenResponse {
            token: self.0.clone(),
            // no expiry information, report a short fixed horizon
            expires_on: OffsetDateTime::now_utc() + Duration::minutes(5),
        })
    }
}
