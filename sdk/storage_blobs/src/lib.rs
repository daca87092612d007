//! Blob data-plane clients authenticated with Shared Key, scoped to what the
//! sample exercises: create a container, upload a block blob, download it
//! back.

mod auth;
pub mod clients;
mod credentials;
pub mod prelude;

pub use clients::{BlobClient, ContainerClient, ContainerClientBuilder, PutBlockBlobResponse};
pub use credentials::{StorageCredentials, EMULATOR_ACCOUNT, EMULATOR_ACCOUNT_KEY};

/// The storage service version sent as `x-ms-version` and assumed by the
/// Shared Key canonicalization rules.
pub const STORAGE_VERSION: &str = "2019-12-12";
