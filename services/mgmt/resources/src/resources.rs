use azstack_core::{http, Result};
use reqwest::Method;

use crate::{Client, GenericResource};

#[derive(Clone)]
pub struct ResourcesClient {
    client: Client,
}

impl ResourcesClient {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// PUT an arbitrary provider resource. The caller picks the api-version
    /// because every provider versions independently.
    pub async fn create_or_update(
        &self,
        resource_group: &str,
        provider_namespace: &str,
        resource_type: &str,
        name: &str,
        api_version: &str,
        resource: GenericResource,
    ) -> Result<GenericResource> {
        let url = self.client.url(
            &format!(
                "subscriptions/{}/resourceGroups/{resource_group}/providers/{provider_namespace}/{resource_type}/{name}",
                self.client.subscription_id()
            ),
            api_version,
        )?;
        let body = serde_json::to_value(&resource)?;
        let response = self.client.send(Method::PUT, url, Some(&body)).await?;
        let response = http::expect_success("resource create", response).await?;
        Ok(response.json().await?)
    }
}
