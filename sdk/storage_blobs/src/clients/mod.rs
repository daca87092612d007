mod blob_client;
mod container_client;

pub use blob_client::{BlobClient, PutBlockBlobResponse};
pub use container_client::{ContainerClient, ContainerClientBuilder};
