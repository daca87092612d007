use azstack_core::{http, Result};
use reqwest::Method;

use crate::models::{StorageAccountListKeysResult, StorageAccountListResult};
use crate::{
    CheckNameAvailabilityResult, Client, NameAvailability, StorageAccount,
    StorageAccountCreateParameters, StorageAccountKey,
};

const API_VERSION: &str = "2019-06-01";

#[derive(Clone)]
pub struct StorageAccountsClient {
    client: Client,
}

impl StorageAccountsClient {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    fn account_path(&self, resource_group: &str, name: &str) -> String {
        format!(
            "subscriptions/{}/resourceGroups/{resource_group}/providers/Microsoft.Storage/storageAccounts/{name}",
            self.client.subscription_id()
        )
    }

    /// Ask the provider whether `name` can still be claimed.
    pub async fn check_name_availability(&self, name: &str) -> Result<NameAvailability> {
        let url = self.client.url(
            &format!(
                "subscriptions/{}/providers/Microsoft.Storage/checkNameAvailability",
                self.client.subscription_id()
            ),
            API_VERSION,
        )?;
        let body = serde_json::json!({
            "name": name,
            "type": "Microsoft.Storage/storageAccounts",
        });
        let response = self.client.send(Method::POST, url, Some(&body)).await?;
        let response = http::expect_success("name availability check", response).await?;
        let result: CheckNameAvailabilityResult = response.json().await?;
        Ok(result.into())
    }

    /// Create the account. Account creation is long running; when the service
    /// answers with an empty accepted body the final state is fetched with a
    /// single follow-up GET rather than a polling loop.
    pub async fn create(
        &self,
        resource_group: &str,
        name: &str,
        parameters: StorageAccountCreateParameters,
    ) -> Result<StorageAccount> {
        let url = self
            .client
            .url(&self.account_path(resource_group, name), API_VERSION)?;
        let body = serde_json::to_value(&parameters)?;
        let response = self.client.send(Method::PUT, url, Some(&body)).await?;
        let response = http::expect_success("storage account create", response).await?;
        let text = response.text().await?;
        if text.trim().is_empty() {
            self.get_properties(resource_group, name).await
        } else {
            Ok(serde_json::from_str(&text)?)
        }
    }

    pub async fn get_properties(&self, resource_group: &str, name: &str) -> Result<StorageAccount> {
        let url = self
            .client
            .url(&self.account_path(resource_group, name), API_VERSION)?;
        let response = self.client.send(Method::GET, url, None).await?;
        let response = http::expect_success("storage account get", response).await?;
        Ok(response.json().await?)
    }

    pub async fn list_keys(
        &self,
        resource_group: &str,
        name: &str,
    ) -> Result<Vec<StorageAccountKey>> {
        let url = self.client.url(
            &format!("{}/listKeys", self.account_path(resource_group, name)),
            API_VERSION,
        )?;
        let response = self.client.send(Method::POST, url, None).await?;
        let response = http::expect_success("storage account list keys", response).await?;
        let result: StorageAccountListKeysResult = response.json().await?;
        Ok(result.keys)
    }

    /// Accounts in one resource group. Single page; the sample never creates
    /// enough accounts for the service to paginate.
    pub async fn list_by_resource_group(
        &self,
        resource_group: &str,
    ) -> Result<Vec<StorageAccount>> {
        let url = self.client.url(
            &format!(
                "subscriptions/{}/resourceGroups/{resource_group}/providers/Microsoft.Storage/storageAccounts",
                self.client.subscription_id()
            ),
            API_VERSION,
        )?;
        let response = self.client.send(Method::GET, url, None).await?;
        let response = http::expect_success("storage account list", response).await?;
        let result: StorageAccountListResult = response.json().await?;
        Ok(result.value)
    }

    /// All accounts in the subscription.
    pub async fn list(&self) -> Result<Vec<StorageAccount>> {
        let url = self.client.url(
            &format!(
                "subscriptions/{}/providers/Microsoft.Storage/storageAccounts",
                self.client.subscription_id()
            ),
            API_VERSION,
        )?;
        let response = self.client.send(Method::GET, url, None).await?;
        let response = http::expect_success("storage account list", response).await?;
        let result: StorageAccountListResult = response.json().await?;
        Ok(result.value)
    }

    pub async fn delete(&self, resource_group: &str, name: &str) -> Result<()> {
        let url = self
            .client
            .url(&self.account_path(resource_group, name), API_VERSION)?;
        let response = self.client.send(Method::DELETE, url, None).await?;
        http::expect_success("storage account delete", response).await?;
        Ok(())
    }
}
