//! Cross-origin policy module
//!
//! The API is callable from any browser origin with credentials. A literal
//! `*` cannot be combined with credentials, so when a request carries an
//! `Origin` header the value is echoed back instead; requests without one
//! get the plain wildcard. The policy applies uniformly to every response
//! the router produces, including 404/405 and preflight.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::HeaderValue;
use hyper::{HeaderMap, Response, StatusCode};

/// Methods advertised to preflight requests
const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, PATCH, HEAD, OPTIONS";

/// Attach origin headers to a response
///
/// * With an `Origin` request header: echo it, allow credentials, and mark
///   the response as varying by origin so caches keep echoes apart.
/// * Without one: plain `Access-Control-Allow-Origin: *`.
pub fn apply_origin(headers: &mut HeaderMap, origin: Option<&HeaderValue>) {
    match origin {
        Some(origin) => {
            headers.insert("Access-Control-Allow-Origin", origin.clone());
            headers.insert(
                "Access-Control-Allow-Credentials",
                HeaderValue::from_static("true"),
            );
            headers.append("Vary", HeaderValue::from_static("Origin"));
        }
        None => {
            headers.insert("Access-Control-Allow-Origin", HeaderValue::from_static("*"));
        }
    }
}

/// Build the preflight (OPTIONS) response
///
/// Allowed headers echo `Access-Control-Request-Headers` when the browser
/// sent it, falling back to the wildcard. The origin headers are attached
/// by the router through `apply_origin`, same as for every other response.
pub fn preflight_response(requested_headers: Option<&HeaderValue>) -> Response<Full<Bytes>> {
    let allow_headers = requested_headers
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("*"));

    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Access-Control-Allow-Methods", ALLOW_METHODS)
        .header("Access-Control-Allow-Headers", allow_headers)
        .header("Access-Control-Max-Age", "86400")
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            crate::logger::log_error(&format!("Failed to build preflight response: {e}"));
            Response::new(Full::new(Bytes::new()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_origin_echoes_and_allows_credentials() {
        let mut headers = HeaderMap::new();
        let origin = HeaderValue::from_static("https://example.com");
        apply_origin(&mut headers, Some(&origin));

        assert_eq!(
            headers.get("Access-Control-Allow-Origin").unwrap(),
            "https://example.com"
        );
        assert_eq!(
            headers.get("Access-Control-Allow-Credentials").unwrap(),
            "true"
        );
        assert_eq!(headers.get("Vary").unwrap(), "Origin");
    }

    #[test]
    fn test_apply_origin_wildcard_without_origin() {
        let mut headers = HeaderMap::new();
        apply_origin(&mut headers, None);

        assert_eq!(headers.get("Access-Control-Allow-Origin").unwrap(), "*");
        assert!(headers.get("Access-Control-Allow-Credentials").is_none());
    }

    #[test]
    fn test_preflight_advertises_all_methods() {
        let resp = preflight_response(None);
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            resp.headers().get("Access-Control-Allow-Methods").unwrap(),
            ALLOW_METHODS
        );
        assert_eq!(
            resp.headers().get("Access-Control-Allow-Headers").unwrap(),
            "*"
        );
        assert_eq!(
            resp.headers().get("Access-Control-Max-Age").unwrap(),
            "86400"
        );
    }

    #[test]
    fn test_preflight_echoes_requested_headers() {
        let requested = HeaderValue::from_static("x-custom-header, content-type");
        let resp = preflight_response(Some(&requested));
        assert_eq!(
            resp.headers().get("Access-Control-Allow-Headers").unwrap(),
            "x-custom-header, content-type"
        );
    }
}
