//! 客户端控制器
//!
//! 流程是线性的：用户操作 → 校验 → 进入加载状态 → 等待网络 → 按结果更新视图 → 退出加载状态。
//! 同一时刻只允许一个生成请求，由显式的 in-flight 标记保证。

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::models::{Envelope, GenerateRequest};

use super::clipboard::Clipboard;
use super::error::{ClientError, UNKNOWN_ERROR};
use super::render::format_content;
use super::transport::{Transport, GENERATE_PATH, HEALTH_PATH};
use super::view::{ViewSnapshot, ViewState, PLACEHOLDER_TEXT};

/// 健康检查返回非 2xx
pub const HEALTH_FAILED_MESSAGE: &str = "API health check failed";

/// 健康检查无法连接
pub const UNREACHABLE_MESSAGE: &str =
    "Unable to connect to the API. Please check if the server is running.";

/// 生成失败提示前缀
const GENERATE_FAILED_PREFIX: &str = "Failed to generate documentation";

/// 一次生成操作的结果
#[derive(Debug)]
pub enum GenerateOutcome {
    /// 结果已渲染到输出区
    Generated,
    /// 失败，错误已展示在输出区
    Failed(ClientError),
    /// 已有请求在进行中，本次未发出请求
    Busy,
}

/// 键盘快捷键
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Ctrl/Cmd + Enter
    Generate,
    /// Escape
    Clear,
}

impl Shortcut {
    /// 由按键名和修饰键识别快捷键
    pub fn from_key(key: &str, ctrl_or_meta: bool) -> Option<Self> {
        match key {
            "Enter" if ctrl_or_meta => Some(Shortcut::Generate),
            "Escape" => Some(Shortcut::Clear),
            _ => None,
        }
    }
}

/// 请求期间持有，释放时清除 in-flight 标记
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// 客户端控制器
pub struct Controller<T, C> {
    transport: T,
    clipboard: C,
    view: Mutex<ViewState>,
    in_flight: AtomicBool,
}

impl<T: Transport, C: Clipboard> Controller<T, C> {
    pub fn new(transport: T, clipboard: C) -> Self {
        Self {
            transport,
            clipboard,
            view: Mutex::new(ViewState::new()),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    /// 当前视图快照
    pub fn snapshot(&self) -> ViewSnapshot {
        self.view.lock().snapshot(Instant::now())
    }

    /// 是否有生成请求在进行中
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn show_error(&self, message: &str) {
        self.view.lock().show_error(message, Instant::now());
    }

    /// 启动时的健康检查，失败只展示错误，不重试
    pub async fn check_health(&self) -> bool {
        match self.transport.get(HEALTH_PATH).await {
            Ok(response) if response.is_success() => {
                info!("API is healthy");
                true
            }
            Ok(response) => {
                warn!("API health check failed: status={}", response.status);
                self.show_error(HEALTH_FAILED_MESSAGE);
                false
            }
            Err(e) => {
                warn!("API health check failed: {}", e);
                self.show_error(UNREACHABLE_MESSAGE);
                false
            }
        }
    }

    /// 输入事件
    pub fn set_notes(&self, notes: &str) {
        self.view.lock().set_notes(notes);
    }

    /// 生成文档
    pub async fn generate(&self) -> GenerateOutcome {
        let notes = self.view.lock().notes().trim().to_string();
        if notes.is_empty() {
            let err = ClientError::EmptyNotes;
            self.show_error(&err.to_string());
            return GenerateOutcome::Failed(err);
        }

        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            debug!("Generate ignored: a request is already in flight");
            return GenerateOutcome::Busy;
        };

        self.view.lock().begin_request();

        let result = self.request_generation(&notes).await;

        let mut view = self.view.lock();
        let now = Instant::now();
        let outcome = match result {
            Ok(message) => {
                view.display_result(format_content(&message), now);
                GenerateOutcome::Generated
            }
            Err(e) => {
                error!("Error generating documentation: {}", e);
                view.show_error(&format!("{}: {}", GENERATE_FAILED_PREFIX, e), now);
                GenerateOutcome::Failed(e)
            }
        };
        view.finish_request();
        outcome
    }

    /// 发送生成请求并判定结果
    ///
    /// 非 2xx 时不解析响应体。
    async fn request_generation(&self, notes: &str) -> Result<String, ClientError> {
        let body = serde_json::to_value(GenerateRequest::new(notes))?;
        let response = self.transport.post_json(GENERATE_PATH, &body).await?;

        if !response.is_success() {
            return Err(ClientError::Status(response.status));
        }

        let envelope: Envelope = serde_json::from_str(&response.body)?;
        if envelope.ok {
            Ok(envelope.message.unwrap_or_default())
        } else {
            let reason = envelope
                .error
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| UNKNOWN_ERROR.to_string());
            Err(ClientError::Application(reason))
        }
    }

    /// 清空输入和输出
    pub fn clear(&self) {
        self.view.lock().clear();
    }

    /// 复制输出区的纯文本
    pub fn copy(&self) -> Result<(), ClientError> {
        let text = self.view.lock().output().text();

        if text.trim().is_empty() || text.contains(PLACEHOLDER_TEXT) {
            let err = ClientError::NothingToCopy;
            self.show_error(&err.to_string());
            return Err(err);
        }

        match self.clipboard.write_text(&text) {
            Ok(()) => {
                self.view.lock().mark_copied(Instant::now());
                Ok(())
            }
            Err(e) => {
                error!("Failed to copy to clipboard: {}", e);
                let err = ClientError::Clipboard(e);
                self.show_error(&err.to_string());
                Err(err)
            }
        }
    }

    /// 处理快捷键
    ///
    /// 生成快捷键只在生成按钮可用时生效；返回 None 表示没有发起生成。
    pub async fn handle_shortcut(&self, shortcut: Shortcut) -> Option<GenerateOutcome> {
        match shortcut {
            Shortcut::Generate => {
                let enabled = self.view.lock().generate_enabled();
                if enabled {
                    Some(self.generate().await)
                } else {
                    None
                }
            }
            Shortcut::Clear => {
                self.clear();
                None
            }
        }
    }
}

impl<T: Transport + 'static, C: Clipboard + 'static> Controller<T, C> {
    /// 在后台执行启动健康检查，不阻塞后续操作
    pub fn spawn_health_check(self: &Arc<Self>) -> JoinHandle<bool> {
        let controller = Arc::clone(self);
        tokio::spawn(async move { controller.check_health().await })
    }
}
