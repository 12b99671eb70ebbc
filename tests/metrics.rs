// tests/metrics.rs
use axum::body::{self, Body};
use axum::http::Request;
use http::StatusCode;
use axum::Router;
use tower::ServiceExt;

// Build full in-process app (API routes + /metrics).
async fn build_app() -> Router {
    verba_sentiment::app()
        .await
        .expect("app() should build Router in tests")
}

#[tokio::test]
async fn metrics_endpoint_reports_analysis_series() {
    let app = build_app().await;

    for text in [r#"{"text":"great service"}"#, r#"{"text":"awful service"}"#] {
        let r = app
            .clone()
            .oneshot(
                Request::post("/analyze")
                    .header("content-type", "application/json")
                    .body(Body::from(text))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(r.status(), StatusCode::OK);
    }

    let resp = app
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    // axum::body::to_bytes requires an explicit limit
    let body = body::to_bytes(resp.into_body(), 1_048_576).await.unwrap(); // 1 MiB
    let text = String::from_utf8(body.to_vec()).unwrap();

    for needle in [
        "sentiment_requests_total",
        "sentiment_label_total",
        "label=\"POSITIVE\"",
        "label=\"NEGATIVE\"",
        "sentiment_score",
    ] {
        assert!(
            text.contains(needle),
            "metrics exposition missing '{needle}'\n{text}"
        );
    }
}
