//! HTTP handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::error;

use spdata_metrics::CONTENT_TYPE;

use crate::scrape::scrape;
use crate::ScrapeContext;

/// GET /metrics
pub async fn metrics(State(ctx): State<ScrapeContext>) -> impl IntoResponse {
    match scrape(&ctx).await {
        Ok(body) => (StatusCode::OK, [("content-type", CONTENT_TYPE)], body).into_response(),
        Err(e) => {
            error!(error = %e, "scrape failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// GET /healthz
pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use spdata_metrics::MetricsRegistry;
    use spdata_source::StaticSource;

    use crate::ScrapeSettings;

    fn test_context(output: &str) -> ScrapeContext {
        ScrapeContext::new(
            MetricsRegistry::new(),
            Arc::new(StaticSource::new().with("SPCameraDataType", output)),
            ScrapeSettings::new(["SPCameraDataType"]),
        )
    }

    #[tokio::test]
    async fn metrics_returns_text() {
        let ctx = test_context(r#"{"SPCameraDataType":[{"_name":"cam"}]}"#);
        let resp = metrics(State(ctx)).await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);
        let content_type = resp.headers().get("content-type").unwrap().to_str().unwrap();
        assert!(content_type.contains("text/plain"));
    }

    #[tokio::test]
    async fn metrics_error_is_500() {
        let ctx = test_context("[]");
        let resp = metrics(State(ctx)).await.into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn healthz_ok() {
        let resp = healthz().await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
