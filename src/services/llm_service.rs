//! LLM 服务封装
//!
//! 封装 LlmClient，与配置系统集成，对外暴露 `NoteGenerator`

use async_trait::async_trait;
use tracing::warn;

use crate::config::AppConfig;
use crate::llm::{ChatOptions, Completion, LlmClient, LlmError};

use super::PromptService;

/// 未配置密钥时返回给调用方的提示
pub const MISSING_API_KEY_MESSAGE: &str =
    "OpenAI API key not configured. Please set OPENAI_API_KEY in your environment variables.";

/// 笔记到临床文档的生成器
#[async_trait]
pub trait NoteGenerator: Send + Sync {
    /// 根据已去除首尾空白的笔记生成文档
    async fn generate(&self, notes: &str) -> Result<Completion, LlmError>;
}

/// LLM 服务
pub struct LlmService {
    client: Option<LlmClient>,
    prompts: PromptService,
    model: String,
    options: ChatOptions,
}

impl LlmService {
    /// 从给定配置创建 LLM 服务
    pub fn from_config(config: &AppConfig) -> Self {
        let client = if config.api_key.is_empty() {
            None
        } else {
            match LlmClient::new(&config.api_key, &config.base_url) {
                Ok(client) => Some(client),
                Err(e) => {
                    warn!("Failed to create LLM client: {}", e);
                    None
                }
            }
        };

        Self {
            client,
            prompts: PromptService::new(),
            model: config.model.clone(),
            options: ChatOptions {
                temperature: Some(config.temperature),
                top_p: Some(config.top_p),
                max_tokens: Some(config.max_tokens),
            },
        }
    }

    /// 是否已配置可用的客户端
    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }
}

#[async_trait]
impl NoteGenerator for LlmService {
    async fn generate(&self, notes: &str) -> Result<Completion, LlmError> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| LlmError::ConfigError(MISSING_API_KEY_MESSAGE.to_string()))?;

        let messages = self.prompts.build_documentation_messages(notes);
        client.complete(&messages, &self.model, &self.options).await
    }
}
