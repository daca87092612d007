use std::borrow::Cow;
use std::error::Error as StdError;

pub(crate) type BoxError = Box<dyn StdError + Send + Sync>;

/// A convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of an [`Error`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Failure to obtain or use a credential.
    Credential,
    /// The service answered with a non-success HTTP status.
    HttpResponse { status: u16 },
    /// A payload could not be serialized or deserialized.
    DataConversion,
    /// Transport-level failure (connection, timeout, ...).
    Io,
    Other,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Credential => f.write_str("credential"),
            ErrorKind::HttpResponse { status } => write!(f, "http response ({status})"),
            ErrorKind::DataConversion => f.write_str("data conversion"),
            ErrorKind::Io => f.write_str("io"),
            ErrorKind::Other => f.write_str("other"),
        }
    }
}

/// The error type used by all crates in this workspace.
#[derive(Debug, thiserror::Error)]
#[error("{kind} error: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: Cow<'static, str>,
    #[source]
    source: Option<BoxError>,
}

impl Error {
    /// Create an error from a kind and a message.
    pub fn message<M: Into<Cow<'static, str>>>(kind: ErrorKind, message: M) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create an error wrapping an underlying source error.
    pub fn with_source<M: Into<Cow<'static, str>>>(
        kind: ErrorKind,
        message: M,
        source: impl Into<BoxError>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        let message = error.to_string();
        Self::with_source(ErrorKind::Io, message, error)
    }
}

impl From<url::ParseError> for Error {
    fn from(error: url::ParseError) -> Self {
        Self::with_source(ErrorKind::DataConversion, error.to_string(), error)
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::with_source(ErrorKind::DataConversion, error.to_string(), error)
    }
}
