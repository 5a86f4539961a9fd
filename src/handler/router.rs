//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for method
//! validation, route matching, the uniform cross-origin policy, and
//! access logging.

use crate::config::AppState;
use crate::handler::endpoints;
use crate::http::{self, cors};
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::HeaderValue;
use hyper::{HeaderMap, Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
///
/// Generic over the body type: no route reads a request body, so the
/// handler only inspects the head. This also lets tests drive it without
/// constructing a live `hyper::body::Incoming`.
pub async fn handle_request<B>(
    req: Request<B>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(ToString::to_string);
    let http_version = version_label(req.version());
    let is_head = method == Method::HEAD;

    let access_log = state.cached_access_log.load(Ordering::Relaxed);
    logger::log_headers_count(req.headers().len(), state.config.logging.show_headers);

    let origin = req.headers().get("origin").cloned();
    let requested_headers = req
        .headers()
        .get("access-control-request-headers")
        .cloned();
    let referer = header_value(req.headers(), "referer");
    let user_agent = header_value(req.headers(), "user-agent");

    let mut response = match method {
        Method::OPTIONS => cors::preflight_response(requested_headers.as_ref()),
        Method::GET | Method::HEAD => {
            match check_body_size(&req, state.config.http.max_body_size) {
                Some(resp) => resp,
                None => route_request(&path, is_head),
            }
        }
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            http::method_not_allowed()
        }
    };

    // Cross-origin policy and Server header apply to every response
    cors::apply_origin(response.headers_mut(), origin.as_ref());
    if let Ok(server_name) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert("Server", server_name);
    }

    if access_log {
        let mut entry =
            AccessLogEntry::new(peer_addr.ip().to_string(), method.to_string(), path);
        entry.query = query;
        entry.http_version = http_version.to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = body_len(&response);
        entry.referer = referer;
        entry.user_agent = user_agent;
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route request based on path
fn route_request(path: &str, is_head: bool) -> Response<Full<Bytes>> {
    match path {
        "/" => endpoints::welcome(is_head),
        "/health" => endpoints::health(is_head),
        "/api/items" => endpoints::items(is_head),
        _ => http::not_found(),
    }
}

/// Validate Content-Length header and return 413 if exceeded
///
/// No route reads a body; this is a transport guard only.
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::payload_too_large())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Extract a header as an owned string, ignoring non-UTF8 values
fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

/// Response body size in bytes (exact for the fixed bodies served here)
fn body_len(response: &Response<Full<Bytes>>) -> usize {
    use hyper::body::Body as _;
    usize::try_from(response.body().size_hint().exact().unwrap_or(0)).unwrap_or(0)
}

/// HTTP version label for access logs
fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
