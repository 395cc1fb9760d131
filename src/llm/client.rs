//! LLM 客户端

use reqwest::Client;
use std::time::Duration;
use tracing::info;

use super::openai::complete_openai;
use super::types::{ChatMessage, ChatOptions, Completion, LlmError};

/// OpenAI 兼容的 LLM 客户端
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl LlmClient {
    /// 创建新的 LLM 客户端
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(LlmError::ConfigError("API Key is required".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .connect_timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(LlmError::HttpError)?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.into(),
        })
    }

    /// 请求一次完整补全
    pub async fn complete(
        &self,
        messages: &[ChatMessage],
        model: &str,
        options: &ChatOptions,
    ) -> Result<Completion, LlmError> {
        info!("LLM request: model={}, messages={}", model, messages.len());
        complete_openai(
            &self.client,
            &self.api_key,
            &self.base_url,
            messages,
            model,
            options,
        )
        .await
    }
}
