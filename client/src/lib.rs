//! Networking core for the movies client.
//!
//! Endpoints are declared as data ([`endpoints::ApiEndpoint`]), rendered and
//! executed by a [`transport::NetworkService`], and decoded by the
//! [`transfer::DataTransferService`], which also classifies failures into
//! [`DataTransferError`].

pub mod config;
pub mod endpoints;
pub mod error;
pub mod transfer;
pub mod transport;

pub use config::NetworkConfig;
pub use endpoints::{
    ApiEndpoint, BodyEncoding, Endpoint, RequestFingerprint, RequestIntent, Requestable,
    ResponseDecoderKind,
};
pub use error::{BoxError, DataTransferError, DecodeError, NetworkError};
pub use transfer::{
    DataTransferErrorLogger, DataTransferErrorResolver, DataTransferService, ResolvedError,
};
pub use transport::{DefaultNetworkService, NetworkLogger, NetworkService};
