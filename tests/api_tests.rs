use axum::{
    Json, Router,
    body::Body,
    http::{Request, StatusCode},
    routing::{get, post},
};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use listing_poster::api::models::{ExtractResponse, GALLERY_LIMIT, GenerateResponse};
use listing_poster::api::{AppState, create_router};
use listing_poster::config::Config;
use listing_poster::data_models::{DESCRIPTION_NOT_FOUND, FailureKind};
use listing_poster::extractor::ListingExtractor;
use listing_poster::generator::SummaryGenerator;

mod test_helpers {
    use super::*;

    pub async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    /// A listing site with fifteen photos and a chat-completion endpoint.
    pub async fn spawn_upstream() -> String {
        let photos = (0..15)
            .map(|i| {
                format!(
                    r#"<img itemprop="contentUrl" src="https://media.rightmove.co.uk/p/IMG_{i:02}_max_656x437.jpeg">"#
                )
            })
            .collect::<String>();
        let listing = format!(
            r#"<html><body><div class="STw8udCxUaBUMfOOZu0iL">Bright 1 bed flat near KCL, £1200 PCM</div>{photos}</body></html>"#
        );

        let router = Router::new()
            .route("/properties/1", get(move || async move { axum::response::Html(listing) }))
            .route("/missing", get(|| async { StatusCode::NOT_FOUND }))
            .route(
                "/chat/completions",
                post(|Json(body): Json<Value>| async move {
                    let prompt = body["messages"][0]["content"].as_str().unwrap_or_default();
                    let content = if prompt.contains("4.33") {
                        "💰【租金详情】：£1200 PCM / 约 £277 PW"
                    } else {
                        "unexpected prompt"
                    };
                    Json(json!({ "choices": [{ "message": { "content": content } }] }))
                }),
            );
        spawn_stub(router).await
    }

    pub fn app(base: &str, api_key: Option<&str>) -> Router {
        let config = Config {
            api_url: format!("{base}/chat/completions"),
            api_key: api_key.map(|k| k.to_string()),
            generation_timeout: Duration::from_secs(5),
            ..Config::default()
        };
        let state = AppState {
            extractor: ListingExtractor::from_config(&config).unwrap(),
            generator: SummaryGenerator::from_config(&config).unwrap(),
        };
        create_router(Arc::new(state), "static")
    }

    pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Vec<u8>) {
        let res = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }
}

#[cfg(test)]
mod extract_endpoint {
    use super::test_helpers::*;
    use super::*;

    #[tokio::test]
    async fn test_gallery_is_capped() {
        let base = spawn_upstream().await;
        let (status, body) = post_json(
            app(&base, None),
            "/api/extract",
            json!({ "url": format!("{base}/properties/1") }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let res: ExtractResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(res.description, "Bright 1 bed flat near KCL, £1200 PCM");
        assert_eq!(res.images.len(), GALLERY_LIMIT);
        assert_eq!(res.total_images, 15);
        assert_eq!(
            res.images[0],
            "https://media.rightmove.co.uk/p/IMG_00_max_656x437.jpeg"
        );
        assert!(res.ready_for_generation);
        assert!(res.error.is_none());
    }

    #[tokio::test]
    async fn test_fetch_failure_is_reported_in_body() {
        let base = spawn_upstream().await;
        let (status, body) = post_json(
            app(&base, None),
            "/api/extract",
            json!({ "url": format!("{base}/missing") }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let res: ExtractResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(res.error.unwrap().kind, FailureKind::Network);
        assert_eq!(res.description, DESCRIPTION_NOT_FOUND);
        assert!(res.images.is_empty());
        assert!(!res.ready_for_generation);
    }

    #[tokio::test]
    async fn test_empty_url_rejected() {
        let (status, _) =
            post_json(app("http://127.0.0.1:9", None), "/api/extract", json!({ "url": " " })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[cfg(test)]
mod generate_endpoint {
    use super::test_helpers::*;
    use super::*;

    #[tokio::test]
    async fn test_generates_summary() {
        let base = spawn_upstream().await;
        let (status, body) = post_json(
            app(&base, Some("sk-test")),
            "/api/generate",
            json!({ "description": "Bright 1 bed flat near KCL, £1200 PCM, available now" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let res: GenerateResponse = serde_json::from_slice(&body).unwrap();
        assert!(res.text.contains("277"));
    }

    #[tokio::test]
    async fn test_blank_or_sentinel_description_rejected() {
        for description in ["", "   ", DESCRIPTION_NOT_FOUND] {
            let (status, _) = post_json(
                app("http://127.0.0.1:9", Some("sk-test")),
                "/api/generate",
                json!({ "description": description }),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn test_generation_failure_is_bad_gateway() {
        let base = spawn_upstream().await;
        let (status, body) = post_json(
            app(&base, None),
            "/api/generate",
            json!({ "description": "Studio in Zone 2" }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        let message = String::from_utf8(body).unwrap();
        assert!(message.contains("balance or network"));
        assert!(message.contains("LLM_API_KEY"));
    }
}

#[cfg(test)]
mod page_endpoint {
    use super::*;

    #[tokio::test]
    async fn test_page_offers_manual_photo_upload() {
        let static_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/static");
        let state = AppState {
            extractor: ListingExtractor::from_config(&Config::default()).unwrap(),
            generator: SummaryGenerator::from_config(&Config::default()).unwrap(),
        };
        let res = create_router(Arc::new(state), static_dir)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains(r#"type="file" multiple accept=".jpg,.jpeg,.png"#));
        assert!(html.contains("URL.createObjectURL"));
        assert!(html.contains(r#"class="gallery""#));
        assert!(html.contains("repeat(3, 1fr)"));
    }
}
