//! Shared Key request signing.
//!
//! The string-to-sign layout (service version 2019-12-12):
//!
//! ```text
//! VERB\n
//! Content-Encoding\nContent-Language\nContent-Length\nContent-MD5\n
//! Content-Type\nDate\nIf-Modified-Since\nIf-Match\nIf-None-Match\n
//! If-Unmodified-Since\nRange\n
//! CanonicalizedHeaders\nCanonicalizedResource
//! ```
//!
//! Content-Length must be the empty string for zero-length bodies, the
//! canonicalized headers are the sorted lowercase `x-ms-*` headers, and the
//! canonicalized resource is `/{account}{path}` followed by sorted
//! `key:value` query lines.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use url::Url;

use azstack_core::{Error, ErrorKind, Result};

pub(crate) struct CanonicalRequest<'a> {
    pub method: &'a reqwest::Method,
    pub url: &'a Url,
    pub content_length: u64,
    pub content_type: &'a str,
    /// `x-ms-*` headers that will go on the request, unsorted.
    pub ms_headers: &'a [(String, String)],
}

pub(crate) fn string_to_sign(account: &str, request: &CanonicalRequest<'_>) -> String {
    let content_length = if request.content_length == 0 {
        String::new()
    } else {
        request.content_length.to_string()
    };

    let mut headers: Vec<(String, String)> = request
        .ms_headers
        .iter()
        .map(|(k, v)| (k.to_lowercase(), v.clone()))
        .collect();
    headers.sort_by(|a, b| a.0.cmp(&b.0));
    let canonicalized_headers = headers
        .iter()
        .map(|(k, v)| format!("{k}:{v}"))
        .collect::<Vec<_>>()
        .join("\n");

    let mut canonicalized_resource = format!("/{}{}", account, request.url.path());
    let mut query: Vec<(String, String)> = request
        .url
        .query_pairs()
        .map(|(k, v)| (k.to_lowercase(), v.into_owned()))
        .collect();
    query.sort();
    // repeated keys collapse onto one line with comma-joined values
    let mut lines: Vec<(String, String)> = Vec::new();
    for (key, value) in query {
        match lines.last_mut() {
            Some((last_key, joined)) if *last_key == key => {
                joined.push(',');
                joined.push_str(&value);
            }
            _ => lines.push((key, value)),
        }
    }
    for (key, value) in &lines {
        canonicalized_resource.push_str(&format!("\n{key}:{value}"));
    }

    format!(
        "{}\n\n\n{}\n\n{}\n\n\n\n\n\n\n{}\n{}",
        request.method, content_length, request.content_type, canonicalized_headers,
        canonicalized_resource
    )
}

/// Build the `Authorization: SharedKey {account}:{signature}` header value.
pub(crate) fn authorization(
    account: &str,
    key: &str,
    request: &CanonicalRequest<'_>,
) -> Result<String> {
    let key = base64::decode(key).map_err(|e| {
        Error::with_source(ErrorKind::Credential, "account key is not valid base64", e)
    })?;
    let mut mac = Hmac::<Sha256>::new_from_slice(&key)
        .map_err(|e| Error::with_source(ErrorKind::Credential, "account key rejected by hmac", e))?;
    mac.update(string_to_sign(account, request).as_bytes());
    let signature = base64::encode(mac.finalize().into_bytes());
    Ok(format!("SharedKey {account}:{signature}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATE: &str = "Mon, 01 Jan 2024 00:00:00 GMT";

    fn ms_headers(extra: Option<(&str, &str)>) -> Vec<(String, String)> {
        let mut headers = vec![
            ("x-ms-version".to_string(), crate::STORAGE_VERSION.to_string()),
            ("x-ms-date".to_string(), DATE.to_string()),
        ];
        if let Some((k, v)) = extra {
            headers.push((k.to_string(), v.to_string()));
        }
        headers
    }

    #[test]
    fn container_create_string_to_sign() {
        let url = Url::parse("https://sa1abc.blob.local.azurestack.external/sample?restype=container")
            .unwrap();
        let headers = ms_headers(None);
        let request = CanonicalRequest {
            method: &reqwest::Method::PUT,
            url: &url,
            content_length: 0,
            content_type: "",
            ms_headers: &headers,
        };
        assert_eq!(
            string_to_sign("sa1abc", &request),
            "PUT\n\n\n\n\n\n\n\n\n\n\n\n\
             x-ms-date:Mon, 01 Jan 2024 00:00:00 GMT\nx-ms-version:2019-12-12\n\
             /sa1abc/sample\nrestype:container"
        );
    }

    #[test]
    fn put_blob_string_to_sign_carries_length_type_and_sorted_headers() {
        let url = Url::parse("https://sa1abc.blob.local.azurestack.external/sample/blockblob").unwrap();
        let headers = ms_headers(Some(("x-ms-blob-type", "BlockBlob")));
        let request = CanonicalRequest {
            method: &reqwest::Method::PUT,
            url: &url,
            content_length: 5120,
            content_type: "application/octet-stream",
            ms_headers: &headers,
        };
        assert_eq!(
            string_to_sign("sa1abc", &request),
            "PUT\n\n\n5120\n\napplication/octet-stream\n\n\n\n\n\n\n\
             x-ms-blob-type:BlockBlob\n\
             x-ms-date:Mon, 01 Jan 2024 00:00:00 GMT\nx-ms-version:2019-12-12\n\
             /sa1abc/sample/blockblob"
        );
    }

    #[test]
    fn repeated_query_keys_share_one_comma_joined_line() {
        let url = Url::parse(
            "https://sa1abc.blob.local/sample?comp=list&include=snapshots&include=metadata",
        )
        .unwrap();
        let headers = ms_headers(None);
        let request = CanonicalRequest {
            method: &reqwest::Method::GET,
            url: &url,
            content_length: 0,
            content_type: "",
            ms_headers: &headers,
        };
        assert!(string_to_sign("sa1abc", &request).ends_with(
            "/sa1abc/sample\ncomp:list\ninclude:metadata,snapshots"
        ));
    }

    #[test]
    fn authorization_uses_shared_key_scheme() {
        let url = Url::parse("https://devstoreaccount1.blob.local/sample").unwrap();
        let headers = ms_headers(None);
        let request = CanonicalRequest {
            method: &reqwest::Method::GET,
            url: &url,
            content_length: 0,
            content_type: "",
            ms_headers: &headers,
        };
        let header = authorization("devstoreaccount1", crate::EMULATOR_ACCOUNT_KEY, &request)
            .expect("emulator key must sign");
        assert!(header.starts_with("SharedKey devstoreaccount1:"));
    }

    #[test]
    fn undecodable_keys_are_credential_errors() {
        let url = Url::parse("https://sa1abc.blob.local/sample").unwrap();
        let headers = ms_headers(None);
        let request = CanonicalRequest {
            method: &reqwest::Method::GET,
            url: &url,
            content_length: 0,
            content_type: "",
            ms_headers: &headers,
        };
        let error = authorization("sa1abc", "not base64!!", &request).unwrap_err();
        assert_eq!(error.kind(), &ErrorKind::Credential);
    }
}
