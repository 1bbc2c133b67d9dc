//! Client response data object.
//!
//! # Responsibilities
//! - Carry the normalized repository response back over the bus
//! - Provide the fixed internal-error value used for every recovered failure
//!
//! # Design Decisions
//! - Built exactly once per request: either fully from upstream or the sentinel
//! - Body is raw bytes; on the wire it is a string when valid UTF-8,
//!   otherwise an array of bytes
//! - Upstream headers are passed through unfiltered

use bytes::Bytes;
use hyper::HeaderMap;
use hyper::StatusCode;
use serde::{Deserialize, Serialize};

use crate::http::Headers;

/// Normalized response returned to the bridge caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientResponse {
    status_code: u16,
    #[serde(default)]
    headers: Headers,
    #[serde(default, with = "body_repr")]
    body: Bytes,
}

impl ClientResponse {
    pub fn new(status_code: u16, headers: Headers, body: Bytes) -> Self {
        Self {
            status_code,
            headers,
            body,
        }
    }

    /// The `500`, no headers, empty body value.
    pub fn internal_error() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            Headers::new(),
            Bytes::new(),
        )
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn is_internal_error(&self) -> bool {
        *self == Self::internal_error()
    }

    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Convert a hyper header map into the multi-valued wire representation.
///
/// Non UTF-8 header values are converted lossily.
pub fn headers_from_map(map: &HeaderMap) -> Headers {
    let mut headers = Headers::new();
    for name in map.keys() {
        let values = map
            .get_all(name)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .collect();
        headers.insert(name.as_str().to_string(), values);
    }
    headers
}

mod body_repr {
    use bytes::Bytes;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(body: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
        match std::str::from_utf8(body) {
            Ok(text) => serializer.serialize_str(text),
            Err(_) => serializer.collect_seq(body.iter()),
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Text(String),
        Raw(Vec<u8>),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Bytes, D::Error> {
        Ok(match Repr::deserialize(deserializer)? {
            Repr::Text(text) => Bytes::from(text),
            Repr::Raw(raw) => Bytes::from(raw),
        })
    }
}
