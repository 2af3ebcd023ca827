use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    create_link_handler, health_handler, list_links_handler, redirect_handler,
};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route(
                "/api/links",
                post(create_link_handler).get(list_links_handler),
            )
            .route("/r/{code}", get(redirect_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::links::OWNER_HEADER;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use curtail_cache::MokaCache;
    use curtail_generator::{RandomCode, Strategy};
    use curtail_service::LinkService;
    use curtail_storage::InMemoryStore;
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_router() -> Router {
        let service = LinkService::new(
            InMemoryStore::new(),
            MokaCache::new(),
            Strategy::Random(RandomCode::new()),
        );
        App::router(AppState::new(Arc::new(service), "http://sho.rt"))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn create_request(original_url: &str, owner: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/links")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(owner) = owner {
            builder = builder.header(OWNER_HEADER, owner);
        }
        builder
            .body(Body::from(format!(
                "{{\"originalUrl\":\"{}\"}}",
                original_url
            )))
            .unwrap()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let router = test_router();

        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn create_then_redirect() {
        let router = test_router();

        let response = router
            .clone()
            .oneshot(create_request("https://example.com/page", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["originalUrl"], "https://example.com/page");
        let code = body["shortCode"].as_str().unwrap();
        assert_eq!(
            body["shortUrl"].as_str().unwrap(),
            format!("http://sho.rt/r/{}", code)
        );

        let response = router
            .oneshot(
                Request::builder()
                    .uri(format!("/r/{}", code))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "https://example.com/page"
        );
    }

    #[tokio::test]
    async fn unknown_code_is_not_found() {
        let router = test_router();

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/r/nosuch")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_url_is_a_bad_request() {
        let router = test_router();

        let response = router
            .oneshot(create_request("not-a-url", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn listing_is_scoped_to_the_owner_header() {
        let router = test_router();

        router
            .clone()
            .oneshot(create_request("https://example.com/mine", Some("user-1")))
            .await
            .unwrap();
        router
            .clone()
            .oneshot(create_request("https://example.com/theirs", Some("user-2")))
            .await
            .unwrap();
        router
            .clone()
            .oneshot(create_request("https://example.com/anon", None))
            .await
            .unwrap();

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/links")
                    .header(OWNER_HEADER, "user-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let listed = body.as_array().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["originalUrl"], "https://example.com/mine");

        // No identity header means no listable links.
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/links")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_json(response).await.as_array().unwrap().is_empty());
    }
}
