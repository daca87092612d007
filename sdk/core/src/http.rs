//! Small helpers shared by the REST clients.

use crate::{Error, ErrorKind, Result};

/// A fresh value for the `x-ms-client-request-id` header.
pub fn client_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Pass through successful responses; turn anything else into an
/// [`ErrorKind::HttpResponse`] error carrying the response body text.
pub async fn expect_success(context: &str, response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::message(
        ErrorKind::HttpResponse {
            status: status.as_u16(),
        },
        format!("{context} failed: {body}"),
    ))
}
