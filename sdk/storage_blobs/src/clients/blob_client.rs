use bytes::Bytes;
use reqwest::Method;
use url::Url;

use azstack_core::{http, Error, ErrorKind, Result};

use crate::clients::ContainerClient;

#[derive(Clone, Debug)]
pub struct BlobClient {
    container: ContainerClient,
    blob_name: String,
}

#[derive(Clone, Debug)]
pub struct PutBlockBlobResponse {
    pub etag: Option<String>,
    /// Number of bytes the service accepted.
    pub content_length: u64,
}

impl BlobClient {
    pub(crate) fn new(container: ContainerClient, blob_name: String) -> Self {
        Self {
            container,
            blob_name,
        }
    }

    pub fn blob_name(&self) -> &str {
        &self.blob_name
    }

    fn url(&self) -> Result<Url> {
        let mut url = self.container.url().clone();
        url.path_segments_mut()
            .map_err(|()| Error::message(ErrorKind::DataConversion, "invalid blob url"))?
            .push(&self.blob_name);
        Ok(url)
    }

    /// Upload the whole body as a single block blob.
    pub async fn put_block_blob(&self, body: impl Into<Bytes>) -> Result<PutBlockBlobResponse> {
        let body = body.into();
        let content_length = body.len() as u64;
        let response = self
            .container
            .send(
                Method::PUT,
                self.url()?,
                "application/octet-stream",
                vec![("x-ms-blob-type".to_string(), "BlockBlob".to_string())],
                Some(body),
            )
            .await?;
        let response = http::expect_success("put block blob", response).await?;
        let etag = response
            .headers()
            .get(reqwest::header::ETAG)
            .and_then(|v| v.to_str().ok())
            .map(ToOwned::to_owned);
        Ok(PutBlockBlobResponse {
            etag,
            content_length,
        })
    }

    /// Download the whole blob.
    pub async fn get(&self) -> Result<Bytes> {
        let response = self
            .container
            .send(Method::GET, self.url()?, "", Vec::new(), None)
            .await?;
        let response = http::expect_success("get blob", response).await?;
        Ok(response.bytes().await?)
    }
}
