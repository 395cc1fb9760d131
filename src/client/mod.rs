//! 无界面客户端
//!
//! 收集医疗笔记、调用生成接口、把结果渲染成轻量 HTML。
//! DOM 换成了显式的视图状态，剪贴板和网络通过 trait 注入。

mod clipboard;
mod controller;
mod error;
mod render;
mod transport;
mod view;

pub use clipboard::{Clipboard, ClipboardError, CommandClipboard, MemoryClipboard};
pub use controller::{Controller, GenerateOutcome, Shortcut, HEALTH_FAILED_MESSAGE, UNREACHABLE_MESSAGE};
pub use error::{ClientError, UNKNOWN_ERROR};
pub use render::{escape_html, format_content, to_plain_text};
pub use transport::{HttpTransport, RawResponse, Transport, TransportError, GENERATE_PATH, HEALTH_PATH};
pub use view::{Output, ViewSnapshot, ViewState, PLACEHOLDER_TEXT};
