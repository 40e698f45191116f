use std::{collections::BTreeMap, fmt};

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Order-independent cache key for a request.
///
/// Built from the method, the path and the query/body parameters sorted by
/// name, so two requests describing the same call compare equal no matter in
/// which order their parameters were added.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestFingerprint {
    method: String,
    path: String,
    query: Vec<(String, String)>,
    body: Vec<(String, String)>,
}

impl RequestFingerprint {
    pub fn new(
        method: &Method,
        path: &str,
        query: &BTreeMap<String, String>,
        body: &Map<String, Value>,
    ) -> Self {
        let query = query
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let mut body: Vec<(String, String)> = body
            .iter()
            .map(|(k, v)| (k.clone(), canonical_json(v)))
            .collect();
        body.sort();

        Self {
            method: method.as_str().to_string(),
            path: path.trim_start_matches('/').to_string(),
            query,
            body,
        }
    }
}

impl fmt::Display for RequestFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)?;
        for (i, (k, v)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{k}={v}")?;
        }
        if !self.body.is_empty() {
            f.write_str(" {")?;
            for (i, (k, v)) in self.body.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{k}:{v}")?;
            }
            f.write_str("}")?;
        }
        Ok(())
    }
}

/// JSON text with object keys sorted at every depth.
fn canonical_json(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, String)> =
                map.iter().map(|(k, v)| (k, canonical_json(v))).collect();
            entries.sort();
            let fields: Vec<String> = entries
                .into_iter()
                .map(|(k, v)| format!("{}:{v}", Value::String(k.clone())))
                .collect();
            format!("{{{}}}", fields.join(","))
        }
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(canonical_json).collect();
            format!("[{}]", items.join(","))
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{hash_map::DefaultHasher, HashMap};
    use std::hash::{Hash, Hasher};

    use serde_json::json;

    use crate::endpoints::{ApiEndpoint, Requestable};

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn parameter_order_does_not_change_fingerprint() {
        let a = ApiEndpoint::<()>::get("search/movie")
            .query("query", "batman")
            .query("page", "1")
            .body("filters", json!({"year": 1989, "adult": false}))
            .body("sort", "popularity");
        let b = ApiEndpoint::<()>::get("search/movie")
            .query("page", "1")
            .query("query", "batman")
            .body("sort", "popularity")
            .body("filters", json!({"adult": false, "year": 1989}));

        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(hash_of(&a.fingerprint()), hash_of(&b.fingerprint()));
    }

    #[test]
    fn leading_slash_is_ignored() {
        let a = ApiEndpoint::<()>::get("/search/movie").query("page", "1");
        let b = ApiEndpoint::<()>::get("search/movie").query("page", "1");
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn different_parameters_produce_different_fingerprints() {
        let page1 = ApiEndpoint::<()>::get("search/movie").query("page", "1");
        let page2 = ApiEndpoint::<()>::get("search/movie").query("page", "2");
        let other_path = ApiEndpoint::<()>::get("discover/movie").query("page", "1");
        let post = ApiEndpoint::<()>::post("search/movie").query("page", "1");

        let mut seen = HashMap::new();
        for endpoint in [&page1, &page2, &other_path, &post] {
            seen.insert(endpoint.fingerprint(), ());
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn display_is_stable_and_readable() {
        let endpoint = ApiEndpoint::<()>::get("search/movie")
            .query("query", "batman")
            .query("page", "1");
        assert_eq!(
            endpoint.fingerprint().to_string(),
            "GET search/movie?page=1&query=batman"
        );
    }
}
