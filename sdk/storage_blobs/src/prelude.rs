pub use crate::clients::{BlobClient, ContainerClient, ContainerClientBuilder};
pub use crate::credentials::StorageCredentials;
