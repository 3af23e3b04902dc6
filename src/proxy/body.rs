//! Relayed response body strategy.

use axum::body::Bytes;
use axum::http::{header, HeaderMap, Method, StatusCode};
use serde_json::Value;

use crate::proxy::error::ForwardError;

/// Body relayed back to the inbound caller.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Decoded JSON, re-encoded on the way out.
    Structured(Value),
    /// Anything else, passed through byte-for-byte.
    Raw(Bytes),
}

impl ResponseBody {
    /// Pick the strategy from the upstream `content-type` and decode.
    ///
    /// Responses that carry no payload by protocol (HEAD, 1xx, 204, 304) are
    /// always raw, as are content-encoded ones: the caller negotiated the
    /// encoding and decodes it.
    pub fn from_upstream(
        method: &Method,
        status: StatusCode,
        headers: &HeaderMap,
        bytes: Bytes,
    ) -> Result<Self, ForwardError> {
        if is_bodyless(method, status) || is_encoded(headers) || !is_json(headers) {
            return Ok(ResponseBody::Raw(bytes));
        }
        let value = serde_json::from_slice(&bytes)?;
        Ok(ResponseBody::Structured(value))
    }

    /// Whether the relayed bytes differ from what the upstream sent.
    pub fn is_reencoded(&self) -> bool {
        matches!(self, ResponseBody::Structured(_))
    }

    pub fn into_bytes(self) -> Result<Bytes, ForwardError> {
        match self {
            ResponseBody::Structured(value) => Ok(Bytes::from(serde_json::to_vec(&value)?)),
            ResponseBody::Raw(bytes) => Ok(bytes),
        }
    }
}

/// Whether `content-type` declares JSON.
pub fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_ascii_lowercase().contains("application/json"))
        .unwrap_or(false)
}

/// Whether `content-encoding` names anything other than `identity`.
pub fn is_encoded(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::CONTENT_ENCODING)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .any(|coding| !coding.trim().eq_ignore_ascii_case("identity"))
}

fn is_bodyless(method: &Method, status: StatusCode) -> bool {
    method == Method::HEAD
        || status.is_informational()
        || status == StatusCode::NO_CONTENT
        || status == StatusCode::NOT_MODIFIED
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde_json::json;

    fn typed(content_type: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers
    }

    #[test]
    fn json_is_decoded_and_reencoded_compactly() {
        let body = ResponseBody::from_upstream(
            &Method::GET,
            StatusCode::OK,
            &typed("application/json; charset=utf-8"),
            Bytes::from_static(b"{ \"a\" : 1,\n  \"b\": [true] }"),
        )
        .unwrap();

        assert_eq!(body, ResponseBody::Structured(json!({"a": 1, "b": [true]})));
        let bytes = body.into_bytes().unwrap();
        let reparsed: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(reparsed, json!({"a": 1, "b": [true]}));
    }

    #[test]
    fn content_type_match_ignores_case() {
        assert!(is_json(&typed("Application/JSON")));
        assert!(!is_json(&typed("text/html")));
        assert!(!is_json(&HeaderMap::new()));
    }

    #[test]
    fn non_json_passes_through() {
        let body = ResponseBody::from_upstream(
            &Method::GET,
            StatusCode::OK,
            &typed("text/html"),
            Bytes::from_static(b"<p>hi</p>"),
        )
        .unwrap();
        assert_eq!(body.into_bytes().unwrap(), Bytes::from_static(b"<p>hi</p>"));
    }

    #[test]
    fn invalid_json_has_no_raw_fallback() {
        let err = ResponseBody::from_upstream(
            &Method::POST,
            StatusCode::OK,
            &typed("application/json"),
            Bytes::from_static(b"not json"),
        )
        .unwrap_err();
        assert!(matches!(err, ForwardError::InvalidJson(_)));
    }

    #[test]
    fn compressed_json_passes_through() {
        let mut headers = typed("application/json");
        headers.insert(header::CONTENT_ENCODING, HeaderValue::from_static("gzip"));
        let gzipped = Bytes::from_static(b"\x1f\x8b\x08\x00\x00\x00\x00\x00\x02\x03\xab\x56");

        let body =
            ResponseBody::from_upstream(&Method::GET, StatusCode::OK, &headers, gzipped.clone()).unwrap();
        assert_eq!(body, ResponseBody::Raw(gzipped));
        assert!(!body.is_reencoded());
    }

    #[test]
    fn identity_encoding_is_still_decoded() {
        let mut headers = typed("application/json");
        headers.insert(header::CONTENT_ENCODING, HeaderValue::from_static("Identity"));
        assert!(!is_encoded(&headers));

        let body =
            ResponseBody::from_upstream(&Method::GET, StatusCode::OK, &headers, Bytes::from_static(b"[1]"))
                .unwrap();
        assert_eq!(body, ResponseBody::Structured(json!([1])));
        assert!(body.is_reencoded());
    }

    #[test]
    fn bodyless_responses_are_raw() {
        let headers = typed("application/json");
        for (method, status) in [
            (Method::HEAD, StatusCode::OK),
            (Method::DELETE, StatusCode::NO_CONTENT),
            (Method::GET, StatusCode::NOT_MODIFIED),
        ] {
            let body = ResponseBody::from_upstream(&method, status, &headers, Bytes::new()).unwrap();
            assert_eq!(body, ResponseBody::Raw(Bytes::new()));
        }
    }
}
