//! Endpoint handlers module
//!
//! The three API endpoints and their fixed payloads. Handlers are pure:
//! every response is a constant, so repeated requests are byte-identical.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::http::json_response;

/// Welcome payload served at `/`
#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub message: &'static str,
    pub status: &'static str,
}

/// Health payload served at `/health`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Item list payload served at `/api/items`
#[derive(Debug, Serialize)]
pub struct ItemsResponse {
    pub items: [&'static str; 3],
}

/// `GET /` - welcome message
pub fn welcome(is_head: bool) -> Response<Full<Bytes>> {
    json_response(
        StatusCode::OK,
        &WelcomeResponse {
            message: "Welcome to DevOps Pipeline API",
            status: "healthy",
        },
        is_head,
    )
}

/// `GET /health` - health check
pub fn health(is_head: bool) -> Response<Full<Bytes>> {
    json_response(StatusCode::OK, &HealthResponse { status: "ok" }, is_head)
}

/// `GET /api/items` - fixed item list
pub fn items(is_head: bool) -> Response<Full<Bytes>> {
    json_response(
        StatusCode::OK,
        &ItemsResponse {
            items: ["item1", "item2", "item3"],
        },
        is_head,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_bytes(resp: Response<Full<Bytes>>) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_welcome_body() {
        let resp = welcome(false);
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_bytes(resp).await;
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "message": "Welcome to DevOps Pipeline API",
                "status": "healthy"
            })
        );
    }

    #[tokio::test]
    async fn test_health_body() {
        let resp = health(false);
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_bytes(resp).await;
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, serde_json::json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_items_body() {
        let resp = items(false);
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_bytes(resp).await;
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "items": ["item1", "item2", "item3"] })
        );
    }

    #[tokio::test]
    async fn test_bodies_are_byte_identical_across_requests() {
        let first = body_bytes(items(false)).await;
        let second = body_bytes(items(false)).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_head_variants_are_empty() {
        for resp in [welcome(true), health(true), items(true)] {
            assert_eq!(resp.status(), StatusCode::OK);
            assert!(resp.headers().contains_key("Content-Length"));
            let body = body_bytes(resp).await;
            assert!(body.is_empty());
        }
    }
}
