//! End-to-end Azure Stack walkthrough: authenticate a service principal,
//! create a resource group, a key vault and a storage account, print keys and
//! account listings, round-trip a blob, then tear everything down.
//!
//! The required environment variables are listed in [`config::REQUIRED_VARS`];
//! the sample prints the missing ones and exits without any remote call when
//! the configuration is incomplete.

mod config;
mod names;
mod provision;

use std::sync::Arc;

use azstack_core::auth::{ClientSecretCredential, TokenCredential};
use azstack_core::{Error, ErrorKind, Result};
use azstack_mgmt_resources::{GenericResource, ResourceGroup, ResourcesClient};
use azstack_mgmt_storage::{Kind, Sku, SkuName, StorageAccount, StorageAccountCreateParameters};
use azstack_storage_blobs::prelude::*;
use rand::RngCore;

use crate::config::Config;

const KEY_VAULT_NAME: &str = "KeyVaultSample";
const BLOB_CONTAINER: &str = "sample";
const BLOB_NAME: &str = "blockblob";
const BLOB_SIZE: usize = 5 * 1024;

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(missing) => {
            eprintln!("Please provide environment variables for:");
            for name in missing.0 {
                eprintln!("{name}");
            }
            std::process::exit(2);
        }
    };

    std::process::exit(run(&config).await);
}

async fn run(config: &Config) -> i32 {
    let credential: Arc<dyn TokenCredential> = Arc::new(ClientSecretCredential::new(
        config.active_directory_endpoint.as_str(),
        config.tenant_id.as_str(),
        config.client_id.as_str(),
        config.client_secret.as_str(),
    ));
    let resources = azstack_mgmt_resources::Client::new(
        config.management_endpoint.as_str(),
        config.subscription_id.as_str(),
        config.active_directory_resource_id.as_str(),
        credential.clone(),
    );
    let storage = azstack_mgmt_storage::Client::new(
        config.management_endpoint.as_str(),
        config.subscription_id.as_str(),
        config.active_directory_resource_id.as_str(),
        credential,
    );

    let rg_name = names::random_name("rgAzS", 20);
    let account_name = names::random_storage_account_name("sa1", 20);

    let outcome = run_sample(config, &resources, &storage, &rg_name, &account_name).await;
    if let Err(error) = &outcome {
        eprintln!("Sample failed: {error}");
    }

    // Cleanup runs regardless of how the main sequence ended, and its
    // failure is reported separately.
    let cleanup = provision::cleanup_resource_group(&resources.resource_groups(), &rg_name).await;
    let cleanup_failed = match cleanup {
        Ok(_) => false,
        Err(error) => {
            eprintln!("Cleanup failed: {error}");
            true
        }
    };

    if outcome.is_err() || cleanup_failed {
        1
    } else {
        0
    }
}

async fn run_sample(
    config: &Config,
    resources: &azstack_mgmt_resources::Client,
    storage: &azstack_mgmt_storage::Client,
    rg_name: &str,
    account_name: &str,
) -> Result<()> {
    let groups = resources.resource_groups();
    println!("Creating a resource group...");
    let group = groups
        .create_or_update(rg_name, ResourceGroup::new(config.location.as_str()))
        .await?;
    println!(
        "Resource group created with name {}\n",
        group.name.as_deref().unwrap_or(rg_name)
    );

    create_key_vault(config, &resources.resources(), rg_name, KEY_VAULT_NAME).await?;

    let accounts = storage.storage_accounts();
    provision::create_storage_account(
        &accounts,
        rg_name,
        account_name,
        default_account_parameters(&config.location),
    )
    .await?;

    let keys = accounts.list_keys(rg_name, account_name).await?;
    for key in &keys {
        println!("Key {} = {}", key.key_name, key.value);
    }
    println!();

    let account = accounts.get_properties(rg_name, account_name).await?;
    log::debug!(
        "account {} provisioning state: {:?}",
        account_name,
        account.properties.as_ref().and_then(|p| p.provisioning_state.as_deref())
    );

    println!("Print all the storage accounts under resource group \"{rg_name}\":");
    print_storage_accounts(&accounts.list_by_resource_group(rg_name).await?);

    println!(
        "Print all the storage accounts under Sub \"{}\":",
        storage.subscription_id()
    );
    print_storage_accounts(&accounts.list().await?);

    let key = keys.first().ok_or_else(|| {
        Error::message(ErrorKind::Other, "storage account returned no access keys")
    })?;
    blob_round_trip(config, account_name, &key.value).await?;

    provision::delete_storage_account(&accounts, rg_name, account_name).await?;
    Ok(())
}

/// The key vault has no dedicated bindings; provision it with a generic PUT
/// the way any unmodeled provider resource would be.
async fn create_key_vault(
    config: &Config,
    resources: &ResourcesClient,
    rg_name: &str,
    vault_name: &str,
) -> Result<String> {
    println!("Create a Key Vault resource with a generic PUT");
    let parameters = GenericResource {
        location: config.location.clone(),
        properties: serde_json::json!({
            "tenantId": config.tenant_id,
            "sku": {"family": "A", "name": "standard"},
            "accessPolicies": [],
            "enabledForDeployment": true,
            "enabledForTemplateDeployment": true,
            "enabledForDiskEncryption": true,
        }),
        ..GenericResource::default()
    };
    let vault = resources
        .create_or_update(
            rg_name,
            "Microsoft.KeyVault",
            "vaults",
            vault_name,
            "2015-06-01",
            parameters,
        )
        .await?;

    println!("Key Vault Name: {}", vault.name.as_deref().unwrap_or(vault_name));
    println!("Key Vault Id: {}", vault.id.as_deref().unwrap_or("<unknown>"));
    let vault_uri = vault.properties["vaultUri"]
        .as_str()
        .ok_or_else(|| {
            Error::message(ErrorKind::DataConversion, "vault response is missing vaultUri")
        })?
        .to_string();
    println!("Key Vault BaseURI: {vault_uri}");
    Ok(vault_uri)
}

fn default_account_parameters(location: &str) -> StorageAccountCreateParameters {
    StorageAccountCreateParameters {
        location: location.to_string(),
        sku: Sku::new(SkuName::StandardLrs),
        kind: Kind::Storage,
        tags: [
            ("key1".to_string(), "value1".to_string()),
            ("key2".to_string(), "value2".to_string()),
        ]
        .into(),
    }
}

fn print_storage_accounts(accounts: &[StorageAccount]) {
    for account in accounts {
        let created = account
            .creation_time()
            .map(|t| t.to_string())
            .unwrap_or_else(|| "<unknown>".to_string());
        println!(
            "{} created @ {created}",
            account.name.as_deref().unwrap_or("<unnamed>")
        );
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn test_config(tenant: &str, subscription: &str) -> Config {
        Config {
            active_directory_endpoint: mockito::server_url(),
            active_directory_resource_id: "https://management.example".to_string(),
            management_endpoint: mockito::server_url(),
            storage_endpoint_suffix: "local.azurestack.external".to_string(),
            subscription_id: subscription.to_string(),
            tenant_id: tenant.to_string(),
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            location: "local".to_string(),
        }
    }

    // Group names carry a random 20-character suffix, so the mocks match on
    // the name shape rather than an exact path.
    fn group_path(subscription: &str) -> Matcher {
        Matcher::Regex(format!(
            r"^/subscriptions/{subscription}/resourcegroups/rgAzS[0-9A-Za-z]{{20}}\?api-version=2018-05-01$"
        ))
    }

    #[tokio::test]
    async fn cleanup_still_deletes_the_group_when_a_step_fails() {
        let _token = mockito::mock("POST", "/tenant-run1/oauth2/token")
            .with_header("content-type", "application/json")
            .with_body(r#"{"token_type":"Bearer","expires_in":3600,"access_token":"t"}"#)
            .create();
        let _put = mockito::mock("PUT", group_path("sub-run1"))
            .with_status(500)
            .with_body(r#"{"error":{"code":"InternalServerError"}}"#)
            .create();
        let head = mockito::mock("HEAD", group_path("sub-run1"))
            .with_status(204)
            .expect(1)
            .create();
        let delete = mockito::mock("DELETE", group_path("sub-run1"))
            .with_status(202)
            .expect(1)
            .create();

        let exit = run(&test_config("tenant-run1", "sub-run1")).await;

        head.assert();
        delete.assert();
        assert_eq!(exit, 1);
    }
}

/// Upload a fixed-size random payload and download it back, reporting the
/// byte counts on each side.
async fn blob_round_trip(config: &Config, account_name: &str, account_key: &str) -> Result<()> {
    println!("Creating a blob container...");
    let container = ContainerClientBuilder::new(
        account_name,
        BLOB_CONTAINER,
        StorageCredentials::Key(account_name.to_string(), account_key.to_string()),
    )
    .endpoint_suffix(config.storage_endpoint_suffix.as_str())
    .build()?;
    container.create_if_not_exists().await?;
    println!("Blob Container '{BLOB_CONTAINER}' created.");

    let mut payload = vec![0u8; BLOB_SIZE];
    rand::thread_rng().fill_bytes(&mut payload);

    let blob = container.blob_client(BLOB_NAME);
    println!("Uploading the blob.");
    let uploaded = blob.put_block_blob(payload).await?;
    println!("Upload completed.");
    println!("Size of blob : {} bytes.", uploaded.content_length);

    println!("Downloading a blob.");
    let downloaded = blob.get().await?;
    println!("Download completed.");
    println!("Downloaded stream size : {} bytes.", downloaded.len());
    Ok(())
}
