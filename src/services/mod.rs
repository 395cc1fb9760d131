//! 服务层模块

mod llm_service;
mod prompt_service;

pub use llm_service::{LlmService, NoteGenerator, MISSING_API_KEY_MESSAGE};
pub use prompt_service::PromptService;
