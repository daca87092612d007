//! ARM storage-account bindings: name availability, account lifecycle, key
//! listing and the two collection listings the sample prints.

mod client;
mod models;
mod storage_accounts;

pub use client::Client;
pub use models::{
    CheckNameAvailabilityResult, Kind, NameAvailability, Sku, SkuName, StorageAccount,
    StorageAccountCreateParameters, StorageAccountKey, StorageAccountProperties,
};
pub use storage_accounts::StorageAccountsClient;
