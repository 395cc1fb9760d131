//! 临床文档生成端点

use axum::{body::Bytes, extract::State, routing::post, Json, Router};
use std::sync::Arc;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::llm::LlmError;
use crate::models::{Envelope, GenerateRequest};
use crate::state::AppState;

/// 解析请求体
///
/// 缺失或格式错误的请求体按空 prompt 处理。
fn parse_prompt(body: &[u8]) -> String {
    serde_json::from_slice::<GenerateRequest>(body)
        .unwrap_or_default()
        .prompt
        .trim()
        .to_string()
}

/// 生成处理器
async fn generate(State(state): State<Arc<AppState>>, body: Bytes) -> AppResult<Json<Envelope>> {
    let prompt = parse_prompt(&body);
    if prompt.is_empty() {
        return Err(AppError::BadRequest("prompt is required".to_string()));
    }

    let request_id = Uuid::new_v4().to_string()[..8].to_string();
    run_generation(&state, &prompt)
        .instrument(info_span!("generate", request_id = %request_id))
        .await
}

async fn run_generation(state: &AppState, prompt: &str) -> AppResult<Json<Envelope>> {
    info!("Generating documentation: prompt_chars={}", prompt.chars().count());

    let completion = state.generator.generate(prompt).await.map_err(|e| match e {
        LlmError::ConfigError(msg) => {
            error!("Generation not configured: {}", msg);
            AppError::Config(msg)
        }
        other => {
            error!("OpenAI API error: {}", other);
            AppError::Llm(format!("Failed to generate documentation: {}", other))
        }
    })?;

    info!(
        "Generation completed: model={}, tokens_used={:?}",
        completion.model, completion.tokens_used
    );

    Ok(Json(Envelope {
        model: Some(completion.model),
        tokens_used: completion.tokens_used,
        ..Envelope::success(completion.content)
    }))
}

/// 创建生成路由
pub fn generate_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/generate", post(generate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::create_api_routes;
    use crate::llm::Completion;
    use crate::services::{NoteGenerator, MISSING_API_KEY_MESSAGE};
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use parking_lot::Mutex;
    use serde_json::Value;
    use tower::ServiceExt;

    /// 记录收到的 prompt 并返回预设结果
    struct StubGenerator {
        seen: Mutex<Vec<String>>,
        result: fn() -> Result<Completion, LlmError>,
    }

    impl StubGenerator {
        fn new(result: fn() -> Result<Completion, LlmError>) -> Arc<Self> {
            Arc::new(Self {
                seen: Mutex::new(Vec::new()),
                result,
            })
        }
    }

    #[async_trait]
    impl NoteGenerator for StubGenerator {
        async fn generate(&self, notes: &str) -> Result<Completion, LlmError> {
            self.seen.lock().push(notes.to_string());
            (self.result)()
        }
    }

    fn ok_completion() -> Result<Completion, LlmError> {
        Ok(Completion {
            content: "**CHIEF COMPLAINT:**\nChest pain".to_string(),
            model: "gpt-4o-mini".to_string(),
            tokens_used: Some(42),
        })
    }

    async fn post_generate(generator: Arc<StubGenerator>, body: &'static str) -> (StatusCode, Value) {
        let app = create_api_routes(Arc::new(AppState::new(generator)));
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/generate")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_parse_prompt() {
        assert_eq!(parse_prompt(br#"{"prompt": "  notes \n"}"#), "notes");
        assert_eq!(parse_prompt(b"{}"), "");
        assert_eq!(parse_prompt(b"not json"), "");
        assert_eq!(parse_prompt(b""), "");
    }

    #[tokio::test]
    async fn test_generate_success() {
        let generator = StubGenerator::new(ok_completion);
        let (status, body) = post_generate(generator.clone(), r#"{"prompt": "  45M chest pain  "}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
        assert_eq!(body["message"], "**CHIEF COMPLAINT:**\nChest pain");
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["tokens_used"], 42);
        assert_eq!(*generator.seen.lock(), vec!["45M chest pain".to_string()]);
    }

    #[tokio::test]
    async fn test_generate_empty_prompt() {
        let generator = StubGenerator::new(ok_completion);
        let (status, body) = post_generate(generator.clone(), r#"{"prompt": "   "}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"], "prompt is required");
        assert!(generator.seen.lock().is_empty());
    }

    #[tokio::test]
    async fn test_generate_malformed_body() {
        let generator = StubGenerator::new(ok_completion);
        let (status, body) = post_generate(generator, "{oops").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "prompt is required");
    }

    #[tokio::test]
    async fn test_generate_missing_api_key() {
        let generator = StubGenerator::new(|| Err(LlmError::ConfigError(MISSING_API_KEY_MESSAGE.to_string())));
        let (status, body) = post_generate(generator, r#"{"prompt": "notes"}"#).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"], MISSING_API_KEY_MESSAGE);
    }

    #[tokio::test]
    async fn test_generate_upstream_failure() {
        let generator = StubGenerator::new(|| {
            Err(LlmError::ApiError {
                status: 503,
                message: "model unavailable".to_string(),
            })
        });
        let (status, body) = post_generate(generator, r#"{"prompt": "notes"}"#).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let error = body["error"].as_str().unwrap();
        assert!(error.starts_with("Failed to generate documentation: "));
        assert!(error.contains("model unavailable"));
    }

    #[tokio::test]
    async fn test_health_routes() {
        let app = create_api_routes(Arc::new(AppState::new(StubGenerator::new(ok_completion))));

        for uri in ["/health", "/api/health"] {
            let response = app
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let body: Value = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(body["status"], "ok");
        }
    }
}
