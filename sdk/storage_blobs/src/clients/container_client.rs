use reqwest::{header::AUTHORIZATION, Method, StatusCode};
use time::OffsetDateTime;
use url::Url;

use azstack_core::{date, http, Error, ErrorKind, Result};

use crate::auth::{self, CanonicalRequest};
use crate::clients::BlobClient;
use crate::{StorageCredentials, STORAGE_VERSION};

#[derive(Clone, Debug)]
pub struct ContainerClientBuilder {
    account: String,
    container: String,
    credentials: StorageCredentials,
    endpoint_suffix: String,
    endpoint: Option<Url>,
}

impl ContainerClientBuilder {
    #[must_use]
    pub fn new(
        account: impl Into<String>,
        container: impl Into<String>,
        credentials: StorageCredentials,
    ) -> Self {
        Self {
            account: account.into(),
            container: container.into(),
            credentials,
            endpoint_suffix: "core.windows.net".to_string(),
            endpoint: None,
        }
    }

    /// DNS suffix used to derive the blob endpoint, e.g.
    /// `local.azurestack.external` for an Azure Stack deployment.
    #[must_use]
    pub fn endpoint_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.endpoint_suffix = suffix.into();
        self
    }

    /// Full endpoint override; bypasses the account/suffix URL derivation.
    #[must_use]
    pub fn endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    pub fn build(self) -> Result<ContainerClient> {
        let mut url = match self.endpoint {
            Some(endpoint) => endpoint,
            None => Url::parse(&format!(
                "https://{}.blob.{}",
                self.account, self.endpoint_suffix
            ))?,
        };
        url.path_segments_mut()
            .map_err(|()| {
                Error::message(ErrorKind::DataConversion, "endpoint cannot be a base url")
            })?
            .pop_if_empty()
            .push(&self.container);
        Ok(ContainerClient {
            credentials: self.credentials,
            container_name: self.container,
            url,
            http: reqwest::Client::new(),
        })
    }
}

#[derive(Clone, Debug)]
pub struct ContainerClient {
    credentials: StorageCredentials,
    container_name: String,
    url: Url,
    http: reqwest::Client,
}

impl ContainerClient {
    pub fn container_name(&self) -> &str {
        &self.container_name
    }

    pub fn blob_client(&self, blob_name: impl Into<String>) -> BlobClient {
        BlobClient::new(self.clone(), blob_name.into())
    }

    /// Create the container. `Ok(true)` when it was created, `Ok(false)` when
    /// it already existed. Other conflicts, such as a container still being
    /// deleted, are errors.
    pub async fn create_if_not_exists(&self) -> Result<bool> {
        let mut url = self.url.clone();
        url.query_pairs_mut().append_pair("restype", "container");
        let response = self.send(Method::PUT, url, "", Vec::new(), None).await?;
        match response.status() {
            StatusCode::CREATED => Ok(true),
            StatusCode::CONFLICT => {
                let error_code = response
                    .headers()
                    .get("x-ms-error-code")
                    .and_then(|v| v.to_str().ok())
                    .map(ToOwned::to_owned);
                let body = response.text().await.unwrap_or_default();
                let already_exists = match error_code {
                    Some(code) => code == "ContainerAlreadyExists",
                    None => body.contains("<Code>ContainerAlreadyExists</Code>"),
                };
                if already_exists {
                    Ok(false)
                } else {
                    Err(Error::message(
                        ErrorKind::HttpResponse {
                            status: StatusCode::CONFLICT.as_u16(),
                        },
                        format!("container create conflicted: {body}"),
                    ))
                }
            }
            _ => {
                http::expect_success("container create", response).await?;
                Ok(true)
            }
        }
    }

    pub(crate) fn url(&self) -> &Url {
        &self.url
    }

    /// Sign and send one request. `extra_ms_headers` are op-specific
    /// `x-ms-*` headers that participate in canonicalization.
    pub(crate) async fn send(
        &self,
        method: Method,
        url: Url,
        content_type: &str,
        extra_ms_headers: Vec<(String, String)>,
        body: Option<bytes::Bytes>,
    ) -> Result<reqwest::Response> {
        let content_length = body.as_ref().map(|b| b.len() as u64).unwrap_or(0);
        let mut ms_headers = vec![
            (
                "x-ms-date".to_string(),
                date::to_rfc1123(&OffsetDateTime::now_utc())?,
            ),
            ("x-ms-version".to_string(), STORAGE_VERSION.to_string()),
        ];
        ms_headers.extend(extra_ms_headers);

        let StorageCredentials::Key(account, key) = &self.credentials;
        let authorization = auth::authorization(
            account,
            key,
            &CanonicalRequest {
                method: &method,
                url: &url,
                content_length,
                content_type,
                ms_headers: &ms_headers,
            },
        )?;

        log::debug!("{method} {url}");
        let mut request = self
            .http
            .request(method, url)
            .header(AUTHORIZATION, authorization);
        for (key, value) in ms_headers {
            request = request.header(key, value);
        }
        if !content_type.is_empty() {
            request = request.header(reqwest::header::CONTENT_TYPE, content_type);
        }
        if let Some(body) = body {
            request = request.body(body);
        }
        Ok(request.send().await?)
    }
}
