use std::{any::Any, collections::BTreeMap, marker::PhantomData};

use reqwest::{Method, Url};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::{
    config::NetworkConfig,
    endpoints::{decoder::ResponseDecoder, RequestFingerprint, ResponseDecoderKind},
    error::{DecodeError, NetworkError},
};

/// How body parameters are serialized into the request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyEncoding {
    #[default]
    Json,
    FormUrlEncoded,
}

/// A request rendered against a `NetworkConfig`, ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestIntent {
    pub method: Method,
    pub url: Url,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Vec<u8>>,
}

/// Declarative description of one remote request.
///
/// The transport only needs this half of an endpoint: everything required to
/// render the request and to fingerprint it for caching.
pub trait Requestable: Send + Sync {
    /// Path relative to the configured base URL, or an absolute URL when
    /// [`is_full_path`](Requestable::is_full_path) is true.
    fn path(&self) -> &str;

    /// Whether `path` is a complete URL that bypasses the base URL.
    fn is_full_path(&self) -> bool {
        false
    }

    /// Returns the HTTP method for this endpoint.
    fn method(&self) -> Method;

    /// Headers added on top of the configured defaults.
    fn header_parameters(&self) -> &BTreeMap<String, String>;

    /// Query parameters added on top of the configured defaults.
    fn query_parameters(&self) -> &BTreeMap<String, String>;

    /// Parameters serialized into the request body.
    fn body_parameters(&self) -> &Map<String, Value>;

    /// Returns how the body parameters are encoded.
    fn body_encoding(&self) -> BodyEncoding {
        BodyEncoding::Json
    }

    /// Whether responses to this request may be served from a cache.
    fn is_cacheable(&self) -> bool {
        false
    }

    /// Canonical cache key for this request.
    fn fingerprint(&self) -> RequestFingerprint {
        RequestFingerprint::new(
            &self.method(),
            self.path(),
            self.query_parameters(),
            self.body_parameters(),
        )
    }

    /// Combines the base URL, path and merged query parameters.
    fn url(&self, config: &NetworkConfig) -> Result<Url, NetworkError> {
        let raw = if self.is_full_path() {
            self.path().to_string()
        } else {
            let base = config.base_url.as_str();
            let separator = if base.ends_with('/') { "" } else { "/" };
            format!("{base}{separator}{}", self.path().trim_start_matches('/'))
        };

        let mut url = Url::parse(&raw).map_err(|e| NetworkError::UrlGeneration(format!("{raw}: {e}")))?;

        let mut query = config.query_parameters.clone();
        query.extend(
            self.query_parameters()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter());
        }
        Ok(url)
    }

    /// Renders the full request: URL, merged headers and encoded body.
    fn request_intent(&self, config: &NetworkConfig) -> Result<RequestIntent, NetworkError> {
        let url = self.url(config)?;

        let mut headers = config.headers.clone();
        headers.extend(
            self.header_parameters()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );

        let body = if self.body_parameters().is_empty() {
            None
        } else {
            let (content_type, body) = match self.body_encoding() {
                BodyEncoding::Json => (
                    "application/json",
                    serde_json::to_vec(self.body_parameters())
                        .map_err(|e| NetworkError::Generic(Box::new(e)))?,
                ),
                BodyEncoding::FormUrlEncoded => (
                    "application/x-www-form-urlencoded",
                    form_urlencode(self.body_parameters())?.into_bytes(),
                ),
            };
            if !headers.keys().any(|k| k.eq_ignore_ascii_case("content-type")) {
                headers.insert("Content-Type".to_string(), content_type.to_string());
            }
            Some(body)
        };

        Ok(RequestIntent {
            method: self.method(),
            url,
            headers,
            body,
        })
    }
}

/// A [`Requestable`] that also knows how to decode its response.
pub trait Endpoint: Requestable {
    /// The type the response body decodes into.
    type Response;

    /// Whether a successful response must carry a body. When false, an empty
    /// response is still handed to [`decode`](Endpoint::decode).
    fn expects_content(&self) -> bool {
        true
    }

    /// Decodes a response body.
    fn decode(&self, data: &[u8]) -> Result<Self::Response, DecodeError>;
}

/// General purpose endpoint assembled with builder methods.
///
/// `R` is the type the response body decodes into; the decoder strategy is
/// picked with [`decoder`](ApiEndpoint::decoder).
#[derive(Debug, Clone)]
pub struct ApiEndpoint<R> {
    path: String,
    is_full_path: bool,
    method: Method,
    headers: BTreeMap<String, String>,
    query: BTreeMap<String, String>,
    body: Map<String, Value>,
    body_encoding: BodyEncoding,
    is_cacheable: bool,
    decoder: ResponseDecoderKind,
    _response: PhantomData<fn() -> R>,
}

impl<R> ApiEndpoint<R> {
    pub fn new(path: impl Into<String>, method: Method) -> Self {
        Self {
            path: path.into(),
            is_full_path: false,
            method,
            headers: BTreeMap::new(),
            query: BTreeMap::new(),
            body: Map::new(),
            body_encoding: BodyEncoding::Json,
            is_cacheable: false,
            decoder: ResponseDecoderKind::Json,
            _response: PhantomData,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(path, Method::GET)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(path, Method::POST)
    }

    pub fn full_path(mut self, is_full_path: bool) -> Self {
        self.is_full_path = is_full_path;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    /// Adds every top-level field of `value` as a query parameter.
    pub fn query_encodable<T: Serialize>(mut self, value: &T) -> Result<Self, serde_json::Error> {
        for (name, value) in to_object(value)? {
            if let Some(value) = scalar_to_string(&value) {
                self.query.insert(name, value);
            }
        }
        Ok(self)
    }

    pub fn body(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.body.insert(name.into(), value.into());
        self
    }

    /// Adds every top-level field of `value` as a body parameter.
    pub fn body_encodable<T: Serialize>(mut self, value: &T) -> Result<Self, serde_json::Error> {
        self.body.extend(to_object(value)?);
        Ok(self)
    }

    pub fn with_body_encoding(mut self, encoding: BodyEncoding) -> Self {
        self.body_encoding = encoding;
        self
    }

    pub fn cacheable(mut self, is_cacheable: bool) -> Self {
        self.is_cacheable = is_cacheable;
        self
    }

    pub fn decoder(mut self, decoder: ResponseDecoderKind) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn decoder_kind(&self) -> ResponseDecoderKind {
        self.decoder
    }
}

impl<R> Requestable for ApiEndpoint<R> {
    fn path(&self) -> &str {
        &self.path
    }

    fn is_full_path(&self) -> bool {
        self.is_full_path
    }

    fn method(&self) -> Method {
        self.method.clone()
    }

    fn header_parameters(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    fn query_parameters(&self) -> &BTreeMap<String, String> {
        &self.query
    }

    fn body_parameters(&self) -> &Map<String, Value> {
        &self.body
    }

    fn body_encoding(&self) -> BodyEncoding {
        self.body_encoding
    }

    fn is_cacheable(&self) -> bool {
        self.is_cacheable
    }
}

impl<R: DeserializeOwned + Any> Endpoint for ApiEndpoint<R> {
    type Response = R;

    fn expects_content(&self) -> bool {
        self.decoder != ResponseDecoderKind::None
    }

    fn decode(&self, data: &[u8]) -> Result<R, DecodeError> {
        self.decoder.decode(data)
    }
}

fn to_object<T: Serialize>(value: &T) -> Result<Map<String, Value>, serde_json::Error> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(serde::ser::Error::custom(format!(
            "expected a struct or map, got {other}"
        ))),
    }
}

/// Strings are used verbatim; nulls are skipped; everything else uses its
/// JSON representation.
pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn form_urlencode(params: &Map<String, Value>) -> Result<String, NetworkError> {
    // Url's query serializer is the application/x-www-form-urlencoded one.
    let mut scratch =
        Url::parse("http://localhost/").map_err(|e| NetworkError::Generic(Box::new(e)))?;
    scratch.query_pairs_mut().extend_pairs(
        params
            .iter()
            .filter_map(|(k, v)| scalar_to_string(v).map(|v| (k.clone(), v))),
    );
    Ok(scratch.query().unwrap_or_default().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> NetworkConfig {
        NetworkConfig::new(Url::parse("https://api.example.com/3").unwrap())
            .with_query_parameter("api_key", "secret")
            .with_query_parameter("language", "en")
            .with_header("Accept", "application/json")
    }

    #[derive(Serialize)]
    struct Search {
        query: String,
        page: u32,
        include_adult: Option<bool>,
    }

    #[test]
    fn url_joins_base_and_path_with_merged_query() {
        let endpoint = ApiEndpoint::<()>::get("search/movie")
            .query("query", "batman")
            .query("language", "fr");
        let url = endpoint.url(&config()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/3/search/movie?api_key=secret&language=fr&query=batman"
        );
    }

    #[test]
    fn base_url_with_trailing_slash_is_not_doubled() {
        let config = NetworkConfig::new(Url::parse("https://image.example.com/t/p/").unwrap());
        let endpoint = ApiEndpoint::<Vec<u8>>::get("/w500/poster.jpg");
        let url = endpoint.url(&config).unwrap();
        assert_eq!(url.as_str(), "https://image.example.com/t/p/w500/poster.jpg");
    }

    #[test]
    fn full_path_bypasses_base_url() {
        let endpoint = ApiEndpoint::<()>::get("https://other.example.org/ping").full_path(true);
        let url = endpoint.url(&config()).unwrap();
        assert_eq!(url.host_str(), Some("other.example.org"));
        assert_eq!(url.path(), "/ping");
    }

    #[test]
    fn invalid_full_path_raises_url_generation() {
        let endpoint = ApiEndpoint::<()>::get("not a url").full_path(true);
        let err = endpoint.url(&config()).unwrap_err();
        assert!(matches!(err, NetworkError::UrlGeneration(_)));
    }

    #[test]
    fn query_encodable_flattens_struct_fields() {
        let endpoint = ApiEndpoint::<()>::get("search/movie")
            .query_encodable(&Search {
                query: "alien".to_string(),
                page: 2,
                include_adult: None,
            })
            .unwrap();
        let query = endpoint.query_parameters();
        assert_eq!(query.get("query").map(String::as_str), Some("alien"));
        assert_eq!(query.get("page").map(String::as_str), Some("2"));
        assert!(!query.contains_key("include_adult"));
    }

    #[test]
    fn json_body_sets_content_type() {
        let endpoint = ApiEndpoint::<()>::post("lists").body("name", "watch later");
        let intent = endpoint.request_intent(&config()).unwrap();
        assert_eq!(intent.method, Method::POST);
        assert_eq!(
            intent.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(intent.headers.get("Accept").map(String::as_str), Some("application/json"));
        let body: Value = serde_json::from_slice(intent.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["name"], "watch later");
    }

    #[test]
    fn form_body_is_url_encoded() {
        let endpoint = ApiEndpoint::<()>::post("session")
            .body("user", "jane doe")
            .body("remember", true)
            .with_body_encoding(BodyEncoding::FormUrlEncoded);
        let intent = endpoint.request_intent(&config()).unwrap();
        let body = String::from_utf8(intent.body.unwrap()).unwrap();
        let mut pairs: Vec<&str> = body.split('&').collect();
        pairs.sort();
        assert_eq!(pairs, vec!["remember=true", "user=jane+doe"]);
        assert_eq!(
            intent.headers.get("Content-Type").map(String::as_str),
            Some("application/x-www-form-urlencoded")
        );
    }

    #[test]
    fn empty_body_renders_no_body() {
        let intent = ApiEndpoint::<()>::get("genres")
            .request_intent(&config())
            .unwrap();
        assert!(intent.body.is_none());
        assert!(!intent.headers.contains_key("Content-Type"));
    }

    #[test]
    fn decode_follows_selected_decoder() {
        let json = ApiEndpoint::<Vec<u32>>::get("ids");
        assert!(json.expects_content());
        assert_eq!(json.decode(b"[1,2]").unwrap(), vec![1, 2]);

        let raw = ApiEndpoint::<Vec<u8>>::get("w92/a.jpg").decoder(ResponseDecoderKind::RawBytes);
        assert_eq!(raw.decode(b"[1,2]").unwrap(), b"[1,2]".to_vec());

        let empty = ApiEndpoint::<()>::post("ratings").decoder(ResponseDecoderKind::None);
        assert!(!empty.expects_content());
        empty.decode(b"").unwrap();
        assert!(matches!(empty.decode(b"[]"), Err(DecodeError::UnexpectedContent(2))));
    }
}
