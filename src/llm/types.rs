//! LLM 类型定义

use serde::{Deserialize, Serialize};

/// 聊天消息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// 角色：system, user, assistant
    pub role: String,
    /// 消息内容
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// 补全选项
#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    /// 温度参数
    pub temperature: Option<f64>,
    /// top_p 参数
    pub top_p: Option<f64>,
    /// 最大 token 数
    pub max_tokens: Option<u32>,
}

/// 一次补全的结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Completion {
    /// 去除首尾空白后的生成内容
    pub content: String,
    /// 实际使用的模型
    pub model: String,
    /// 总 token 消耗（上游未返回时为 None）
    pub tokens_used: Option<u64>,
}

/// LLM 错误类型
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// HTTP 请求错误
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API 返回错误
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    /// 配置错误
    #[error("{0}")]
    ConfigError(String),

    /// JSON 解析错误
    #[error("JSON parse failed: {0}")]
    JsonError(#[from] serde_json::Error),

    /// 响应内容不符合预期
    #[error("Unexpected response: {0}")]
    ResponseError(String),
}
