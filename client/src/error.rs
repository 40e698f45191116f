use bytes::Bytes;
use thiserror::Error;

/// Boxed cause used where the concrete error type is chosen by a collaborator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failures raised by the transport layer.
#[derive(Error, Debug)]
pub enum NetworkError {
    /// The server answered with a status outside `200..300`. The body is kept
    /// for diagnostics.
    #[error("unexpected HTTP status {status_code}")]
    HttpStatus {
        status_code: u16,
        body: Option<Bytes>,
    },
    #[error("not connected to the internet")]
    NotConnected,
    #[error("request was cancelled")]
    Cancelled,
    /// The base URL and endpoint path could not be combined into a valid URL.
    #[error("failed to generate request URL: {0}")]
    UrlGeneration(String),
    #[error("network request failed: {0}")]
    Generic(#[source] BoxError),
}

impl NetworkError {
    pub fn has_status_code(&self, code: u16) -> bool {
        matches!(self, NetworkError::HttpStatus { status_code, .. } if *status_code == code)
    }

    pub fn is_not_found(&self) -> bool {
        self.has_status_code(404)
    }

    pub fn is_internet_connection_error(&self) -> bool {
        matches!(self, NetworkError::NotConnected)
    }
}

/// Failures raised while turning response bytes into a typed value.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    /// The decoder cannot produce the requested type from raw bytes.
    #[error("type mismatch: expected {expected}, decoder produces {produced}")]
    TypeMismatch {
        expected: &'static str,
        produced: &'static str,
    },
    #[error("expected an empty body, got {0} bytes")]
    UnexpectedContent(usize),
}

/// Failures surfaced by `DataTransferService`.
#[derive(Error, Debug)]
pub enum DataTransferError {
    /// The transport succeeded but returned no body where one was expected.
    #[error("no response body")]
    NoResponse,
    #[error("failed to parse response: {0}")]
    Parsing(#[source] DecodeError),
    /// Transport failure left unchanged by the error resolver.
    #[error("network failure: {0}")]
    NetworkFailure(#[source] NetworkError),
    /// Transport failure remapped by the error resolver to a domain error.
    #[error("resolved network failure: {0}")]
    ResolvedFailure(#[source] BoxError),
}

impl DataTransferError {
    pub fn is_internet_connection_error(&self) -> bool {
        matches!(self, DataTransferError::NetworkFailure(e) if e.is_internet_connection_error())
    }
}
