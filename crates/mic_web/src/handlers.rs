use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use mic_core::output::url_filename;
use mic_core::{Error, Label};
use mic_sources::extract_image_urls;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Deserialize)]
pub struct ClassifyUrlRequest {
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UrlClassification {
    pub id: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    pub classification: Label,
    pub confidence: f64,
    pub source: String,
    #[serde(rename = "originalUrl")]
    pub original_url: String,
    /// Client-visible millisecond timestamp.
    pub timestamp: i64,
}

#[derive(Debug, Serialize)]
pub struct ClassifyUrlResponse {
    pub results: Vec<UrlClassification>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

pub async fn classify_url(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ClassifyUrlRequest>, JsonRejection>,
) -> Response {
    // A malformed body still gets the JSON error contract.
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => return error_response(rejection.status(), rejection.body_text()),
    };
    let Some(url) = request.url.filter(|u| !u.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "URL is required");
    };
    let Some(classifier) = state.classifier.clone() else {
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "model not loaded");
    };

    let html = match state.scraper.fetch_page(&url).await {
        Ok(html) => html,
        // Non-success page status is the client's problem.
        Err(e @ Error::Status(_)) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
        Err(e) => return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };

    let candidates = extract_image_urls(&html, &url);
    let mut results = Vec::new();

    for (index, image_url) in candidates {
        let image = match state.scraper.fetch_image(&image_url).await {
            Ok(image) => image,
            Err(e) => {
                warn!("⚠️ Failed to fetch {}: {}", image_url, e);
                continue;
            }
        };
        let (label, probability) = match classifier.classify(&image) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("⚠️ Failed to classify {}: {}", image_url, e);
                continue;
            }
        };

        if let Some(recorder) = &state.recorder {
            let filename = url_filename(results.len() as u32 + 1, label, probability);
            if let Err(e) = recorder.save(&image, label, &filename) {
                warn!("⚠️ Failed to save {}: {}", filename, e);
            }
        }

        results.push(UrlClassification {
            id: format!("url-{index}"),
            image_url,
            classification: label,
            confidence: probability,
            source: "url".to_string(),
            original_url: url.clone(),
            timestamp: Utc::now().timestamp_millis(),
        });
    }

    Json(ClassifyUrlResponse { results }).into_response()
}

pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    Json(serde_json::json!({
        "status": "healthy",
        "model_loaded": state.classifier.is_some(),
    }))
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_app;
    use axum::body::Body;
    use axum::http::Request;
    use mic_model::FixedClassifier;
    use mic_sources::PageScraper;
    use std::time::Duration;
    use tower::ServiceExt;

    fn test_state(model_loaded: bool) -> AppState {
        let classifier: Option<Arc<dyn mic_model::ImageClassifier>> = if model_loaded {
            Some(Arc::new(FixedClassifier::new(vec![0.9, 0.3]).unwrap()))
        } else {
            None
        };
        AppState {
            classifier,
            scraper: PageScraper::new(Duration::from_secs(10), Duration::from_secs(10)).unwrap(),
            recorder: None,
        }
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_liveness_and_model_state() {
        let app = create_app(test_state(true)).await;
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response.into_response()).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["model_loaded"], true);
    }

    #[tokio::test]
    async fn health_reports_failed_startup_load() {
        let app = create_app(test_state(false)).await;
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_json(response.into_response()).await;
        assert_eq!(body["model_loaded"], false);
    }

    #[tokio::test]
    async fn classify_url_requires_a_url() {
        let app = create_app(test_state(true)).await;
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/classify-url")
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response.into_response()).await;
        assert_eq!(body["error"], "URL is required");
    }

    #[tokio::test]
    async fn malformed_json_keeps_the_error_body_contract() {
        let app = create_app(test_state(true)).await;
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/classify-url")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.status().is_client_error());
        // Body must still be `{"error": ...}`, not axum's plain text.
        let body = body_json(response.into_response()).await;
        assert!(!body["error"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn classify_url_rejects_empty_url() {
        let app = create_app(test_state(true)).await;
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/classify-url")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"url":""}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    async fn spawn_stub_server(router: axum::Router) -> std::net::SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn non_success_page_fetch_maps_to_client_error() {
        // Empty router: every path 404s.
        let addr = spawn_stub_server(axum::Router::new()).await;

        let app = create_app(test_state(true)).await;
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/classify-url")
                    .header("content-type", "application/json")
                    .body(Body::from(format!(r#"{{"url":"http://{addr}/missing"}}"#)))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response.into_response()).await;
        assert_eq!(body["error"], "Status code 404");
    }

    #[tokio::test]
    async fn classify_url_end_to_end_over_a_stubbed_page() {
        use axum::routing::get;

        let mut png = Vec::new();
        image::DynamicImage::new_rgb8(4, 4)
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();

        let page = r#"<html><body>
            <img src="/img.png">
            <img src="relative-skipped.png">
        </body></html>"#;
        let router = axum::Router::new()
            .route("/", get(move || async move { axum::response::Html(page) }))
            .route(
                "/img.png",
                get(move || {
                    let png = png.clone();
                    async move { png }
                }),
            );
        let addr = spawn_stub_server(router).await;

        let app = create_app(test_state(true)).await;
        let page_url = format!("http://{addr}/");
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/classify-url")
                    .header("content-type", "application/json")
                    .body(Body::from(format!(r#"{{"url":"{page_url}"}}"#)))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response.into_response()).await;
        let results = body["results"].as_array().unwrap();
        // The bare-relative src contributes nothing.
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["id"], "url-0");
        assert_eq!(results[0]["classification"], "medical");
        assert_eq!(results[0]["confidence"], 0.9);
        assert_eq!(results[0]["source"], "url");
        assert_eq!(results[0]["originalUrl"], page_url);
        assert_eq!(
            results[0]["imageUrl"],
            format!("http://{addr}/img.png")
        );
        assert!(results[0]["timestamp"].as_i64().unwrap() > 0);
    }

    #[tokio::test]
    async fn classify_url_without_model_is_a_server_error() {
        let app = create_app(test_state(false)).await;
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/classify-url")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"url":"https://example.com"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
