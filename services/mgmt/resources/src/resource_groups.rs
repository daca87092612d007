use azstack_core::{http, Error, ErrorKind, Result};
use reqwest::{Method, StatusCode};

use crate::{Client, ResourceGroup};

const API_VERSION: &str = "2018-05-01";

#[derive(Clone)]
pub struct ResourceGroupsClient {
    client: Client,
}

impl ResourceGroupsClient {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    fn group_url(&self, name: &str) -> Result<url::Url> {
        self.client.url(
            &format!(
                "subscriptions/{}/resourcegroups/{name}",
                self.client.subscription_id()
            ),
            API_VERSION,
        )
    }

    pub async fn create_or_update(&self, name: &str, group: ResourceGroup) -> Result<ResourceGroup> {
        let url = self.group_url(name)?;
        let body = serde_json::to_value(&group)?;
        let response = self.client.send(Method::PUT, url, Some(&body)).await?;
        let response = http::expect_success("resource group create", response).await?;
        Ok(response.json().await?)
    }

    /// `true` when the group exists, `false` when it does not.
    pub async fn check_existence(&self, name: &str) -> Result<bool> {
        let url = self.group_url(name)?;
        let response = self.client.send(Method::HEAD, url, None).await?;
        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(Error::message(
                ErrorKind::HttpResponse {
                    status: status.as_u16(),
                },
                format!("resource group existence check failed for {name}"),
            )),
        }
    }

    /// Resource-group deletion is long running on the service side; 202 means
    /// the request was accepted and deletion continues after we return.
    pub async fn delete(&self, name: &str) -> Result<()> {
        let url = self.group_url(name)?;
        let response = self.client.send(Method::DELETE, url, None).await?;
        http::expect_success("resource group delete", response).await?;
        Ok(())
    }
}
