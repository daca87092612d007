use std::sync::Arc;

use azstack_core::auth::TokenCredential;
use azstack_core::{http, Result};
use url::Url;

use crate::{ResourceGroupsClient, ResourcesClient};

/// Entry point for the resource-manager API of one subscription.
#[derive(Clone)]
pub struct Client {
    endpoint: String,
    subscription_id: String,
    token_audience: String,
    credential: Arc<dyn TokenCredential>,
    http: reqwest::Client,
}

impl Client {
    /// `endpoint` is the resource-manager base URL, `token_audience` the AAD
    /// resource identifier tokens must be scoped to.
    pub fn new(
        endpoint: impl Into<String>,
        subscription_id: impl Into<String>,
        token_audience: impl Into<String>,
        credential: Arc<dyn TokenCredential>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            subscription_id: subscription_id.into(),
            token_audience: token_audience.into(),
            credential,
            http: reqwest::Client::new(),
        }
    }

    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    pub fn resource_groups(&self) -> ResourceGroupsClient {
        ResourceGroupsClient::new(self.clone())
    }

    pub fn resources(&self) -> ResourcesClient {
        ResourcesClient::new(self.clone())
    }

    pub(crate) fn url(&self, path: &str, api_version: &str) -> Result<Url> {
        let mut url = Url::parse(&format!(
            "{}/{path}",
            self.endpoint.trim_end_matches('/')
        ))?;
        url.query_pairs_mut().append_pair("api-version", api_version);
        Ok(url)
    }

    pub(crate) async fn send(
        &self,
        method: reqwest::Method,
        url: Url,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response> {
        let token = self.credential.get_token(&self.token_audience).await?;
        log::debug!("{method} {url}");
        let mut request = self
            .http
            .request(method, url)
            .bearer_auth(token.token.secret())
            .header("x-ms-client-request-id", http::client_request_id());
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }
}
