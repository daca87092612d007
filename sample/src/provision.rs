//! Conditional provisioning steps built on the management clients.
//!
//! Storage account creation and deletion are both gated on a name
//! availability check, with the unknown answer handled explicitly instead of
//! being coerced to either branch.

use azstack_core::Result;
use azstack_mgmt_resources::ResourceGroupsClient;
use azstack_mgmt_storage::{
    NameAvailability, StorageAccount, StorageAccountCreateParameters, StorageAccountsClient,
};

/// Create the account only when its name is still available. Returns the
/// created account, or `None` when creation was skipped.
pub async fn create_storage_account(
    accounts: &StorageAccountsClient,
    resource_group: &str,
    name: &str,
    parameters: StorageAccountCreateParameters,
) -> Result<Option<StorageAccount>> {
    match accounts.check_name_availability(name).await? {
        NameAvailability::Available => {
            println!("\nCreating a storage account...");
            let account = accounts.create(resource_group, name, parameters).await?;
            println!(
                "Storage account created with name {}",
                account.name.as_deref().unwrap_or(name)
            );
            Ok(Some(account))
        }
        NameAvailability::Taken { message, .. } => {
            println!(
                "\nStorage account name \"{name}\" already exists. {}",
                message.unwrap_or_default()
            );
            Ok(None)
        }
        NameAvailability::Unknown => {
            log::warn!("name availability for {name} came back undetermined, skipping create");
            Ok(None)
        }
    }
}

/// Delete the account only when the availability check reports its name as
/// taken. A name that is still available cannot belong to an existing
/// account, so there is nothing to delete. Returns whether a delete was
/// issued.
pub async fn delete_storage_account(
    accounts: &StorageAccountsClient,
    resource_group: &str,
    name: &str,
) -> Result<bool> {
    match accounts.check_name_availability(name).await? {
        NameAvailability::Taken { .. } => {
            println!("Deleting the storage account of {name}");
            accounts.delete(resource_group, name).await?;
            println!("Storage account {name} deleted.\n");
            Ok(true)
        }
        NameAvailability::Available => {
            println!("\nStorage account name \"{name}\" does not exist.\n");
            Ok(false)
        }
        NameAvailability::Unknown => {
            log::warn!("name availability for {name} came back undetermined, skipping delete");
            Ok(false)
        }
    }
}

/// Best-effort teardown of the sample's resource group. Runs whether or not
/// the main sequence succeeded; deletes only when the group still exists.
/// Returns whether a delete was issued.
pub async fn cleanup_resource_group(
    groups: &ResourceGroupsClient,
    name: &str,
) -> Result<bool> {
    if groups.check_existence(name).await? {
        println!("Deleting the ResourceGroup of {name}");
        groups.delete(name).await?;
        println!("sample resource group is cleaned up.\n");
        Ok(true)
    } else {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use azstack_core::auth::BearerTokenCredential;
    use azstack_mgmt_storage::{Kind, Sku, SkuName};
    use std::sync::Arc;

    fn accounts_client(subscription_id: &str) -> StorageAccountsClient {
        azstack_mgmt_storage::Client::new(
            mockito::server_url(),
            subscription_id,
            "https://management.example",
            Arc::new(BearerTokenCredential::new("test-token")),
        )
        .storage_accounts()
    }

    fn groups_client(subscription_id: &str) -> ResourceGroupsClient {
        azstack_mgmt_resources::Client::new(
            mockito::server_url(),
            subscription_id,
            "https://management.example",
            Arc::new(BearerTokenCredential::new("test-token")),
        )
        .resource_groups()
    }

    fn availability_mock(subscription_id: &str, body: &str) -> mockito::Mock {
        mockito::mock(
            "POST",
            format!(
                "/subscriptions/{subscription_id}/providers/Microsoft.Storage/checkNameAvailability?api-version=2019-06-01"
            )
            .as_str(),
        )
        .with_header("content-type", "application/json")
        .with_body(body)
        .create()
    }

    fn account_mock(method: &str, subscription_id: &str, name: &str) -> mockito::Mock {
        mockito::mock(
            method,
            format!(
                "/subscriptions/{subscription_id}/resourceGroups/rg1/providers/Microsoft.Storage/storageAccounts/{name}?api-version=2019-06-01"
            )
            .as_str(),
        )
    }

    fn parameters() -> StorageAccountCreateParameters {
        StorageAccountCreateParameters {
            location: "local".into(),
            sku: Sku::new(SkuName::StandardLrs),
            kind: Kind::Storage,
            tags: Default::default(),
        }
    }

    #[tokio::test]
    async fn creates_exactly_once_when_name_is_available() {
        let _check = availability_mock("sub-pc1", r#"{"nameAvailable":true}"#);
        let put = account_mock("PUT", "sub-pc1", "sa1new")
            .with_body(r#"{"name":"sa1new"}"#)
            .expect(1)
            .create();

        let created = create_storage_account(&accounts_client("sub-pc1"), "rg1", "sa1new", parameters())
            .await
            .unwrap();

        put.assert();
        assert_eq!(created.unwrap().name.as_deref(), Some("sa1new"));
    }

    #[tokio::test]
    async fn skips_create_when_name_is_taken() {
        let _check = availability_mock("sub-pc2", r#"{"nameAvailable":false,"reason":"AlreadyExists"}"#);
        let put = account_mock("PUT", "sub-pc2", "sa1dup").expect(0).create();

        let created = create_storage_account(&accounts_client("sub-pc2"), "rg1", "sa1dup", parameters())
            .await
            .unwrap();

        put.assert();
        assert!(created.is_none());
    }

    #[tokio::test]
    async fn skips_create_when_availability_is_unknown() {
        let _check = availability_mock("sub-pc3", "{}");
        let put = account_mock("PUT", "sub-pc3", "sa1odd").expect(0).create();

        let created = create_storage_account(&accounts_client("sub-pc3"), "rg1", "sa1odd", parameters())
            .await
            .unwrap();

        put.assert();
        assert!(created.is_none());
    }

    #[tokio::test]
    async fn deletes_exactly_once_when_name_is_taken() {
        let _check = availability_mock("sub-pd1", r#"{"nameAvailable":false}"#);
        let delete = account_mock("DELETE", "sub-pd1", "sa1del").expect(1).create();

        let deleted = delete_storage_account(&accounts_client("sub-pd1"), "rg1", "sa1del")
            .await
            .unwrap();

        delete.assert();
        assert!(deleted);
    }

    #[tokio::test]
    async fn skips_delete_when_name_is_available() {
        let _check = availability_mock("sub-pd2", r#"{"nameAvailable":true}"#);
        let delete = account_mock("DELETE", "sub-pd2", "sa1gone").expect(0).create();

        let deleted = delete_storage_account(&accounts_client("sub-pd2"), "rg1", "sa1gone")
            .await
            .unwrap();

        delete.assert();
        assert!(!deleted);
    }

    #[tokio::test]
    async fn cleanup_deletes_when_group_exists() {
        let _head = mockito::mock(
            "HEAD",
            "/subscriptions/sub-cl1/resourcegroups/rgLive?api-version=2018-05-01",
        )
        .with_status(204)
        .create();
        let delete = mockito::mock(
            "DELETE",
            "/subscriptions/sub-cl1/resourcegroups/rgLive?api-version=2018-05-01",
        )
        .with_status(202)
        .expect(1)
        .create();

        assert!(cleanup_resource_group(&groups_client("sub-cl1"), "rgLive")
            .await
            .unwrap());
        delete.assert();
    }

    #[tokio::test]
    async fn cleanup_skips_missing_group() {
        let _head = mockito::mock(
            "HEAD",
            "/subscriptions/sub-cl2/resourcegroups/rgGone?api-version=2018-05-01",
        )
        .with_status(404)
        .create();
        let delete = mockito::mock(
            "DELETE",
            "/subscriptions/sub-cl2/resourcegroups/rgGone?api-version=2018-05-01",
        )
        .expect(0)
        .create();

        assert!(!cleanup_resource_group(&groups_client("sub-cl2"), "rgGone")
            .await
            .unwrap());
        delete.assert();
    }
}
