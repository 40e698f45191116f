//! HTTP transport: renders a [`Requestable`] and executes it with reqwest.

use std::{error::Error as StdError, io, sync::Arc};

use async_trait::async_trait;
use bytes::Bytes;
use log::{debug, warn};
use reqwest::Client;

use crate::{
    config::NetworkConfig,
    endpoints::{RequestIntent, Requestable},
    error::NetworkError,
};

/// Executes requests over the network.
///
/// Returns the response body, or `None` when the server answered with an
/// empty body.
#[async_trait]
pub trait NetworkService: Send + Sync {
    /// Sends the request described by `endpoint` and returns the raw body.
    async fn request(&self, endpoint: &dyn Requestable) -> Result<Option<Bytes>, NetworkError>;
}

/// Diagnostics hooks for outbound requests and raw responses.
///
/// Implementations must not panic; logging is best effort.
pub trait NetworkLogger: Send + Sync {
    fn log_request(&self, request: &RequestIntent);
    fn log_response(&self, status: u16, data: &[u8]);
    fn log_error(&self, error: &NetworkError);
}

/// Writes to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultNetworkLogger;

impl NetworkLogger for DefaultNetworkLogger {
    fn log_request(&self, request: &RequestIntent) {
        debug!("request: {} {}", request.method, request.url);
        if !request.headers.is_empty() {
            debug!("headers: {:?}", request.headers);
        }
        if let Some(body) = &request.body {
            debug!("body: {}", String::from_utf8_lossy(body));
        }
    }

    fn log_response(&self, status: u16, data: &[u8]) {
        // Binary payloads (images) are summarized instead of dumped.
        match std::str::from_utf8(data) {
            Ok(text) if serde_json::from_str::<serde_json::Value>(text).is_ok() => {
                debug!("response {status}: {text}")
            }
            _ => debug!("response {status}: {} bytes", data.len()),
        }
    }

    fn log_error(&self, error: &NetworkError) {
        warn!("network error: {error}");
    }
}

/// reqwest-backed [`NetworkService`].
#[derive(Clone)]
pub struct DefaultNetworkService {
    client: Client,
    config: NetworkConfig,
    logger: Arc<dyn NetworkLogger>,
}

impl DefaultNetworkService {
    pub fn new(config: NetworkConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Uses a preconfigured client, e.g. one carrying a request timeout.
    pub fn with_client(client: Client, config: NetworkConfig) -> Self {
        Self {
            client,
            config,
            logger: Arc::new(DefaultNetworkLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn NetworkLogger>) -> Self {
        self.logger = logger;
        self
    }

    async fn perform(&self, intent: RequestIntent) -> Result<Option<Bytes>, NetworkError> {
        let mut builder = self.client.request(intent.method, intent.url);
        for (name, value) in &intent.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = intent.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(classify_error)?;
        let status = response.status();
        let data = response.bytes().await.map_err(classify_error)?;
        self.logger.log_response(status.as_u16(), &data);

        if !status.is_success() {
            return Err(NetworkError::HttpStatus {
                status_code: status.as_u16(),
                body: Some(data),
            });
        }

        Ok(if data.is_empty() { None } else { Some(data) })
    }
}

#[async_trait]
impl NetworkService for DefaultNetworkService {
    async fn request(&self, endpoint: &dyn Requestable) -> Result<Option<Bytes>, NetworkError> {
        let result = match endpoint.request_intent(&self.config) {
            Ok(intent) => {
                self.logger.log_request(&intent);
                self.perform(intent).await
            }
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            self.logger.log_error(e);
        }
        result
    }
}

/// Maps a reqwest failure onto the transport taxonomy.
///
/// Connection failures become `NotConnected`, aborted or interrupted I/O
/// becomes `Cancelled`, everything else is `Generic`.
pub fn classify_error(error: reqwest::Error) -> NetworkError {
    if error.is_connect() {
        return NetworkError::NotConnected;
    }
    match io_error_kind(&error) {
        Some(io::ErrorKind::ConnectionRefused)
        | Some(io::ErrorKind::NotConnected)
        | Some(io::ErrorKind::AddrNotAvailable) => NetworkError::NotConnected,
        Some(io::ErrorKind::Interrupted) | Some(io::ErrorKind::ConnectionAborted) => {
            NetworkError::Cancelled
        }
        _ => NetworkError::Generic(Box::new(error)),
    }
}

fn io_error_kind(error: &(dyn StdError + 'static)) -> Option<io::ErrorKind> {
    let mut source = error.source();
    while let Some(err) = source {
        if let Some(io_err) = err.downcast_ref::<io::Error>() {
            return Some(io_err.kind());
        }
        source = err.source();
    }
    None
}
