use std::any::{type_name, Any};

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::error::DecodeError;

/// Strategy turning a response body into a typed value.
pub trait ResponseDecoder {
    fn decode<T: DeserializeOwned + Any>(&self, data: &[u8]) -> Result<T, DecodeError>;
}

/// Generic structured decode of a JSON body.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonResponseDecoder;

impl ResponseDecoder for JsonResponseDecoder {
    fn decode<T: DeserializeOwned + Any>(&self, data: &[u8]) -> Result<T, DecodeError> {
        Ok(serde_json::from_slice(data)?)
    }
}

/// Identity decoder for opaque payloads such as images.
///
/// Only byte containers (`Vec<u8>` or `Bytes`) can be produced; any other
/// target type is a `TypeMismatch` rather than a silent reinterpretation.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawDataResponseDecoder;

impl ResponseDecoder for RawDataResponseDecoder {
    fn decode<T: DeserializeOwned + Any>(&self, data: &[u8]) -> Result<T, DecodeError> {
        let mut bytes = Some(Bytes::copy_from_slice(data));
        if let Some(value) = downcast_take::<_, T>(&mut bytes) {
            return Ok(value);
        }
        let mut vec = Some(data.to_vec());
        if let Some(value) = downcast_take::<_, T>(&mut vec) {
            return Ok(value);
        }
        Err(DecodeError::TypeMismatch {
            expected: type_name::<T>(),
            produced: "raw bytes",
        })
    }
}

/// Decoder for endpoints that answer without content.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoContentDecoder;

impl ResponseDecoder for NoContentDecoder {
    fn decode<T: DeserializeOwned + Any>(&self, data: &[u8]) -> Result<T, DecodeError> {
        if !data.iter().all(u8::is_ascii_whitespace) {
            return Err(DecodeError::UnexpectedContent(data.len()));
        }
        downcast_take::<_, T>(&mut Some(())).ok_or(DecodeError::TypeMismatch {
            expected: type_name::<T>(),
            produced: "()",
        })
    }
}

fn downcast_take<S: Any, T: Any>(slot: &mut Option<S>) -> Option<T> {
    (slot as &mut dyn Any)
        .downcast_mut::<Option<T>>()
        .and_then(Option::take)
}

/// Decoder selection carried by an endpoint descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseDecoderKind {
    #[default]
    Json,
    RawBytes,
    None,
}

impl ResponseDecoder for ResponseDecoderKind {
    fn decode<T: DeserializeOwned + Any>(&self, data: &[u8]) -> Result<T, DecodeError> {
        match self {
            ResponseDecoderKind::Json => JsonResponseDecoder.decode(data),
            ResponseDecoderKind::RawBytes => RawDataResponseDecoder.decode(data),
            ResponseDecoderKind::None => NoContentDecoder.decode(data),
        }
    }
}
