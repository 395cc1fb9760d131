//! LLM 模块
//!
//! 提供 OpenAI 兼容的补全客户端。

mod client;
mod format;
mod openai;
mod types;

pub use client::LlmClient;
pub use format::fix_base_url;
pub use types::*;
