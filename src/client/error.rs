//! 客户端错误类型
//!
//! 分类：校验错误、传输错误、协议错误（非 2xx）、应用错误（信封 ok 为假）。
//! 各变体的 Display 就是展示给用户的失败原因。

use super::clipboard::ClipboardError;
use super::transport::TransportError;

/// 信封未给出原因时的兜底文本
pub const UNKNOWN_ERROR: &str = "Unknown error occurred";

/// 客户端错误
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// 输入为空
    #[error("Please enter some medical notes first.")]
    EmptyNotes,

    /// 网络不可达或请求异常
    #[error("{0}")]
    Transport(#[from] TransportError),

    /// 非 2xx 状态码
    #[error("HTTP error! status: {0}")]
    Status(u16),

    /// 2xx 但信封 ok 为假
    #[error("{0}")]
    Application(String),

    /// 响应体不是合法的信封 JSON
    #[error("{0}")]
    Decode(#[from] serde_json::Error),

    /// 输出区没有可复制的内容
    #[error("Nothing to copy. Generate documentation first.")]
    NothingToCopy,

    /// 剪贴板写入失败
    #[error("Failed to copy to clipboard. Please try selecting and copying manually.")]
    Clipboard(#[source] ClipboardError),
}
