use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkuName {
    #[serde(rename = "Standard_LRS")]
    StandardLrs,
    #[serde(rename = "Standard_GRS")]
    StandardGrs,
    #[serde(rename = "Standard_RAGRS")]
    StandardRagrs,
    #[serde(rename = "Standard_ZRS")]
    StandardZrs,
    #[serde(rename = "Premium_LRS")]
    PremiumLrs,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sku {
    pub name: SkuName,
}

impl Sku {
    pub fn new(name: SkuName) -> Self {
        Self { name }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Kind {
    Storage,
    StorageV2,
    BlobStorage,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageAccountCreateParameters {
    pub location: String,
    pub sku: Sku,
    pub kind: Kind,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageAccountProperties {
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub creation_time: Option<OffsetDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_location: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageAccount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<Kind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<Sku>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<StorageAccountProperties>,
}

impl StorageAccount {
    /// Creation time of the account, when the service reported one.
    pub fn creation_time(&self) -> Option<OffsetDateTime> {
        self.properties.as_ref().and_then(|p| p.creation_time)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageAccountKey {
    pub key_name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct StorageAccountListKeysResult {
    #[serde(default)]
    pub keys: Vec<StorageAccountKey>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct StorageAccountListResult {
    #[serde(default)]
    pub value: Vec<StorageAccount>,
}

/// Wire shape of the name availability answer. The service is allowed to
/// omit `nameAvailable` entirely, which is why the field is optional.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckNameAvailabilityResult {
    #[serde(default)]
    pub name_available: Option<bool>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Explicit tri-state view of a name availability check. Callers must handle
/// `Unknown` instead of coercing a missing answer to either branch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NameAvailability {
    Available,
    Taken {
        reason: Option<String>,
        message: Option<String>,
    },
    Unknown,
}

impl From<CheckNameAvailabilityResult> for NameAvailability {
    fn from(result: CheckNameAvailabilityResult) -> Self {
        match result.name_available {
            Some(true) => NameAvailability::Available,
            Some(false) => NameAvailability::Taken {
                reason: result.reason,
                message: result.message,
            },
            None => NameAvailability::Unknown,
        }
    }
}
