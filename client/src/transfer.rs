//! Data transfer service: transport, error classification and decoding.

use std::{error::Error as StdError, sync::Arc};

use bytes::Bytes;
use log::error;

use crate::{
    endpoints::{Endpoint, NoContentDecoder, Requestable, ResponseDecoder},
    error::{BoxError, DataTransferError, DecodeError, NetworkError},
    transport::NetworkService,
};

/// Outcome of running a transport failure through a resolver.
#[derive(Debug)]
pub enum ResolvedError {
    /// Still a network failure; surfaces as `DataTransferError::NetworkFailure`.
    Network(NetworkError),
    /// Remapped to a domain error; surfaces as `DataTransferError::ResolvedFailure`.
    Domain(BoxError),
}

/// Optionally remaps transport errors to domain-specific errors.
pub trait DataTransferErrorResolver: Send + Sync {
    fn resolve(&self, error: NetworkError) -> ResolvedError;
}

/// Leaves every error unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultDataTransferErrorResolver;

impl DataTransferErrorResolver for DefaultDataTransferErrorResolver {
    fn resolve(&self, error: NetworkError) -> ResolvedError {
        ResolvedError::Network(error)
    }
}

pub trait DataTransferErrorLogger: Send + Sync {
    fn log(&self, error: &(dyn StdError + 'static));
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultDataTransferErrorLogger;

impl DataTransferErrorLogger for DefaultDataTransferErrorLogger {
    fn log(&self, error: &(dyn StdError + 'static)) {
        error!("data transfer failed: {error}");
        let mut source = error.source();
        while let Some(cause) = source {
            error!("  caused by: {cause}");
            source = cause.source();
        }
    }
}

/// Turns an endpoint description into a decoded value.
///
/// No retries happen here; retry policy belongs to the caller.
#[derive(Clone)]
pub struct DataTransferService {
    network: Arc<dyn NetworkService>,
    resolver: Arc<dyn DataTransferErrorResolver>,
    logger: Arc<dyn DataTransferErrorLogger>,
}

impl DataTransferService {
    pub fn new(network: Arc<dyn NetworkService>) -> Self {
        Self {
            network,
            resolver: Arc::new(DefaultDataTransferErrorResolver),
            logger: Arc::new(DefaultDataTransferErrorLogger),
        }
    }

    pub fn with_error_resolver(mut self, resolver: Arc<dyn DataTransferErrorResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_error_logger(mut self, logger: Arc<dyn DataTransferErrorLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Fetches and decodes the endpoint's payload.
    ///
    /// An empty body is `NoResponse` unless the endpoint expects no
    /// content; a body the decoder rejects is `Parsing` carrying the
    /// decoder's error.
    pub async fn request<E: Endpoint>(&self, endpoint: &E) -> Result<E::Response, DataTransferError> {
        let data = self
            .network
            .request(endpoint)
            .await
            .map_err(|e| self.resolve(e))?;
        let data = match data {
            Some(data) => data,
            None if !endpoint.expects_content() => Bytes::new(),
            None => return Err(DataTransferError::NoResponse),
        };

        endpoint.decode(&data).map_err(|e| self.parsing(e))
    }

    /// Performs a request whose response carries no content. Any body that
    /// is not blank is a `Parsing` error.
    pub async fn request_no_content<E: Requestable>(&self, endpoint: &E) -> Result<(), DataTransferError> {
        let data = self
            .network
            .request(endpoint)
            .await
            .map_err(|e| self.resolve(e))?;
        match data {
            Some(data) => NoContentDecoder.decode::<()>(&data).map_err(|e| self.parsing(e)),
            None => Ok(()),
        }
    }

    fn parsing(&self, error: DecodeError) -> DataTransferError {
        self.logger.log(&error);
        DataTransferError::Parsing(error)
    }

    fn resolve(&self, error: NetworkError) -> DataTransferError {
        let transfer_error = match self.resolver.resolve(error) {
            ResolvedError::Network(e) => DataTransferError::NetworkFailure(e),
            ResolvedError::Domain(e) => DataTransferError::ResolvedFailure(e),
        };
        self.logger.log(&transfer_error);
        transfer_error
    }
}
