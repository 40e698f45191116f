pub mod decoder;
pub mod endpoint;
pub mod fingerprint;

pub use decoder::{
    JsonResponseDecoder, NoContentDecoder, RawDataResponseDecoder, ResponseDecoder,
    ResponseDecoderKind,
};
pub use endpoint::{ApiEndpoint, BodyEncoding, Endpoint, RequestIntent, Requestable};
pub use fingerprint::RequestFingerprint;
