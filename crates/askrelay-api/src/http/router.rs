//! Axum router configuration with middleware.
//!
//! Middleware: CORS (permissive) and request tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ask", post(handlers::ask::ask))
        .route("/chat/ask", post(handlers::ask::ask))
        .route("/health", get(handlers::health::health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::future::pending;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use askrelay_core::provider::{BoxProviderCall, ProviderCall};
    use askrelay_types::config::{ProviderKind, RelayConfig};
    use askrelay_types::provider::{AnswerContract, ProviderError, ProviderResponse};
    use askrelay_types::question::Question;

    use super::*;

    /// Replies with the same outcome on every call.
    struct Canned(Result<ProviderResponse, ProviderError>);

    impl ProviderCall for Canned {
        fn name(&self) -> &str {
            "canned"
        }

        async fn call(&self, _question: &Question) -> Result<ProviderResponse, ProviderError> {
            self.0.clone()
        }
    }

    /// Never replies.
    struct Hanging;

    impl ProviderCall for Hanging {
        fn name(&self) -> &str {
            "hanging"
        }

        async fn call(&self, _question: &Question) -> Result<ProviderResponse, ProviderError> {
            pending().await
        }
    }

    fn fast_config() -> RelayConfig {
        let mut config = RelayConfig::default();
        config.retry.base_delay_ms = 0;
        config
    }

    fn app_with<P: ProviderCall + 'static>(provider: P, config: RelayConfig) -> Router {
        let state = AppState::from_parts(
            BoxProviderCall::new(provider),
            ProviderKind::Anthropic,
            config,
            |_| true,
        );
        build_router(state)
    }

    fn app(outcome: Result<ProviderResponse, ProviderError>) -> Router {
        app_with(Canned(outcome), fast_config())
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_ask_returns_sanitized_answer() {
        let app = app(Ok(ProviderResponse::Text("<b>hi</b> <script>x</script>".into())));
        let (status, body) = send(app, post_json("/ask", r#"{"question":"Hello?"}"#)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["question"], "Hello?");
        assert_eq!(body["answer"], "<b>hi</b> &lt;script&gt;x&lt;/script&gt;");
    }

    #[tokio::test]
    async fn test_chat_ask_alias_and_contract_answer() {
        let contract = AnswerContract {
            content: Some("**4**".into()),
            ..Default::default()
        };
        let app = app(Ok(ProviderResponse::Contract(contract)));
        let (status, body) = send(
            app,
            post_json("/chat/ask", r#"{"question":"2+2?","system_prompt":"Be terse."}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"question": "2+2?", "answer": "**4**"}));
    }

    #[tokio::test]
    async fn test_missing_question_is_400() {
        let (status, body) = send(app(Ok("x".into())), post_json("/ask", "{}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing question parameter");

        let (status, body) = send(app(Ok("x".into())), post_json("/ask", "not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing question parameter");
    }

    #[tokio::test]
    async fn test_empty_question_is_400() {
        let (status, body) =
            send(app(Ok("x".into())), post_json("/ask", r#"{"question":"   "}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_rate_limited_is_503() {
        let app = app(Err(ProviderError::RateLimited {
            retry_after_ms: None,
        }));
        let (status, body) = send(app, post_json("/ask", r#"{"question":"Q"}"#)).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "API is overloaded, please try again later.");
        assert_eq!(body["code"], "RATE_LIMITED");
    }

    #[tokio::test]
    async fn test_provider_failure_is_502() {
        let app = app(Err(ProviderError::AuthenticationFailed));
        let (status, body) = send(app, post_json("/ask", r#"{"question":"Q"}"#)).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["code"], "PROVIDER_FAILURE");
    }

    #[tokio::test]
    async fn test_malformed_response_is_502() {
        let (status, body) = send(app(Ok("{}".into())), post_json("/ask", r#"{"question":"Q"}"#)).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["code"], "MALFORMED_RESPONSE");
    }

    #[tokio::test]
    async fn test_deadline_is_504() {
        let mut config = fast_config();
        config.server.request_deadline_secs = 0;
        let app = app_with(Hanging, config);

        let (status, body) = send(app, post_json("/ask", r#"{"question":"Q"}"#)).await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body["code"], "CANCELLED");
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(app(Ok("x".into())), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"status": "ok", "checks": {"api_key": "present", "provider": "anthropic"}})
        );
    }

    #[tokio::test]
    async fn test_health_reports_missing_key() {
        let state = AppState::from_parts(
            BoxProviderCall::new(Canned(Ok("x".into()))),
            ProviderKind::Gemini,
            fast_config(),
            |_| false,
        );
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(build_router(state), request).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["checks"]["api_key"], "missing");
        assert_eq!(body["checks"]["provider"], "gemini");
    }
}
