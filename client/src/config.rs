use std::collections::BTreeMap;

use reqwest::Url;

/// Connection settings shared by every request issued through one transport.
///
/// Default headers and query parameters are merged into each rendered
/// request; values declared by the endpoint win on key collision.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub base_url: Url,
    pub headers: BTreeMap<String, String>,
    pub query_parameters: BTreeMap<String, String>,
}

impl NetworkConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            headers: BTreeMap::new(),
            query_parameters: BTreeMap::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_query_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_parameters.insert(name.into(), value.into());
        self
    }
}
