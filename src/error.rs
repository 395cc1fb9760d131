//! 统一错误处理模块
//!
//! 定义服务端错误类型，并实现 axum 的 IntoResponse trait 以便自动转换为 HTTP 响应。
//! 响应体与生成接口的信封格式一致：`{"ok": false, "error": "..."}`。

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::Envelope;

/// 应用错误枚举
#[derive(Error, Debug)]
pub enum AppError {
    /// 配置相关错误
    #[error("{0}")]
    Config(String),

    /// LLM 调用错误
    #[error("{0}")]
    Llm(String),

    /// 请求参数错误
    #[error("{0}")]
    BadRequest(String),
}

impl AppError {
    /// 对应的 HTTP 状态码
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Config(_) | AppError::Llm(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(Envelope::failure(self.to_string()));
        (status, body).into_response()
    }
}

/// 便捷类型别名
pub type AppResult<T> = Result<T, AppError>;
