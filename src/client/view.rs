//! 客户端视图状态
//!
//! 浏览器里散落在 DOM 上的状态（输入框、输出区、按钮禁用、成功/错误样式）
//! 集中到一个结构体里，由控制器独占修改。样式标记用截止时间表示，
//! 读取时与 tokio 时钟比较，不需要后台定时任务。

use std::time::Duration;
use tokio::time::Instant;

use super::render::{escape_html, to_plain_text};

/// 输出区占位文本
pub const PLACEHOLDER_TEXT: &str = "Your professional medical documentation will appear here...";

/// 复制按钮默认文字
pub const COPY_LABEL: &str = "Copy";

/// 复制成功后的按钮文字
pub const COPIED_LABEL: &str = "Copied!";

/// 成功样式持续时间
pub const SUCCESS_MARKER_DURATION: Duration = Duration::from_millis(3000);

/// 错误样式持续时间
pub const ERROR_MARKER_DURATION: Duration = Duration::from_millis(5000);

/// "Copied!" 提示持续时间
pub const COPIED_DURATION: Duration = Duration::from_millis(2000);

/// 输入框最小行数
const MIN_INPUT_ROWS: usize = 1;

/// 输出区内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// 初始占位
    Placeholder,
    /// 已格式化的生成结果（HTML）
    Document(String),
    /// 错误提示（纯文本）
    Error(String),
}

impl Output {
    /// 渲染为输出区的 HTML
    pub fn to_html(&self) -> String {
        match self {
            Output::Placeholder => format!(r#"<div class="placeholder"><p>{}</p></div>"#, PLACEHOLDER_TEXT),
            Output::Document(html) => format!(r#"<div class="fade-in">{}</div>"#, html),
            Output::Error(message) => format!(
                r#"<div class="error-message fade-in">{}</div>"#,
                escape_html(message)
            ),
        }
    }

    /// 输出区的纯文本内容
    pub fn text(&self) -> String {
        match self {
            Output::Placeholder => PLACEHOLDER_TEXT.to_string(),
            Output::Document(html) => to_plain_text(html),
            Output::Error(message) => message.clone(),
        }
    }
}

/// 某一时刻的视图快照
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSnapshot {
    pub notes: String,
    pub input_rows: usize,
    pub output: Output,
    pub loading: bool,
    pub generate_enabled: bool,
    pub copy_enabled: bool,
    /// 输出区是否带成功样式
    pub success_marker: bool,
    /// 输出区是否带错误样式
    pub error_marker: bool,
    pub copy_label: &'static str,
}

impl ViewSnapshot {
    pub fn output_html(&self) -> String {
        self.output.to_html()
    }

    pub fn output_text(&self) -> String {
        self.output.text()
    }
}

/// 视图状态
#[derive(Debug)]
pub struct ViewState {
    notes: String,
    input_rows: usize,
    output: Output,
    loading: bool,
    generate_enabled: bool,
    copy_enabled: bool,
    success_until: Option<Instant>,
    error_until: Option<Instant>,
    copied_until: Option<Instant>,
}

impl ViewState {
    /// 初始状态：两个按钮都禁用，输出区显示占位
    pub fn new() -> Self {
        Self {
            notes: String::new(),
            input_rows: MIN_INPUT_ROWS,
            output: Output::Placeholder,
            loading: false,
            generate_enabled: false,
            copy_enabled: false,
            success_until: None,
            error_until: None,
            copied_until: None,
        }
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn output(&self) -> &Output {
        &self.output
    }

    pub fn generate_enabled(&self) -> bool {
        self.generate_enabled
    }

    /// 输入事件：更新文本、行数和生成按钮状态
    pub fn set_notes(&mut self, notes: &str) {
        self.notes = notes.to_string();
        self.input_rows = notes.lines().count().max(MIN_INPUT_ROWS);
        self.generate_enabled = !notes.trim().is_empty();
    }

    /// 请求开始
    pub fn begin_request(&mut self) {
        self.loading = true;
        self.generate_enabled = false;
        self.copy_enabled = false;
    }

    /// 请求结束（无论成败）
    pub fn finish_request(&mut self) {
        self.loading = false;
        self.generate_enabled = true;
    }

    /// 展示格式化后的生成结果
    pub fn display_result(&mut self, html: String, now: Instant) {
        self.output = Output::Document(html);
        self.copy_enabled = true;
        self.success_until = Some(now + SUCCESS_MARKER_DURATION);
    }

    /// 展示错误
    pub fn show_error(&mut self, message: &str, now: Instant) {
        self.output = Output::Error(message.to_string());
        self.copy_enabled = false;
        self.error_until = Some(now + ERROR_MARKER_DURATION);
    }

    /// 复制成功后的按钮反馈
    pub fn mark_copied(&mut self, now: Instant) {
        self.copied_until = Some(now + COPIED_DURATION);
    }

    /// 清空输入和输出
    pub fn clear(&mut self) {
        self.notes.clear();
        self.input_rows = MIN_INPUT_ROWS;
        self.output = Output::Placeholder;
        self.copy_enabled = false;
        self.generate_enabled = false;
        self.success_until = None;
        self.error_until = None;
    }

    pub fn snapshot(&self, now: Instant) -> ViewSnapshot {
        let active = |until: Option<Instant>| until.is_some_and(|t| now < t);

        ViewSnapshot {
            notes: self.notes.clone(),
            input_rows: self.input_rows,
            output: self.output.clone(),
            loading: self.loading,
            generate_enabled: self.generate_enabled,
            copy_enabled: self.copy_enabled,
            success_marker: active(self.success_until),
            error_marker: active(self.error_until),
            copy_label: if active(self.copied_until) {
                COPIED_LABEL
            } else {
                COPY_LABEL
            },
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let view = ViewState::new();
        let snapshot = view.snapshot(Instant::now());

        assert_eq!(snapshot.output, Output::Placeholder);
        assert!(!snapshot.generate_enabled);
        assert!(!snapshot.copy_enabled);
        assert!(!snapshot.loading);
        assert_eq!(snapshot.copy_label, COPY_LABEL);
    }

    #[test]
    fn test_set_notes_toggles_generate() {
        let mut view = ViewState::new();

        view.set_notes("   \n ");
        assert!(!view.generate_enabled());

        view.set_notes("BP 150/95\nHR 110\nRR 24");
        assert!(view.generate_enabled());
        assert_eq!(view.snapshot(Instant::now()).input_rows, 3);
    }

    #[test]
    fn test_markers_expire() {
        let mut view = ViewState::new();
        let start = Instant::now();

        view.display_result("<strong>Dx:</strong> MI".to_string(), start);
        assert!(view.snapshot(start + Duration::from_millis(2999)).success_marker);
        assert!(!view.snapshot(start + SUCCESS_MARKER_DURATION).success_marker);

        view.show_error("boom", start);
        assert!(view.snapshot(start + Duration::from_millis(4999)).error_marker);
        assert!(!view.snapshot(start + ERROR_MARKER_DURATION).error_marker);
    }

    #[test]
    fn test_error_output_is_escaped() {
        let output = Output::Error("<b>bad</b>".to_string());
        assert_eq!(
            output.to_html(),
            r#"<div class="error-message fade-in">&lt;b&gt;bad&lt;/b&gt;</div>"#
        );
        assert_eq!(output.text(), "<b>bad</b>");
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut view = ViewState::new();
        let now = Instant::now();

        view.set_notes("notes\nmore");
        view.display_result("x".to_string(), now);
        view.show_error("y", now);
        view.clear();

        let snapshot = view.snapshot(now);
        assert_eq!(snapshot.notes, "");
        assert_eq!(snapshot.input_rows, 1);
        assert_eq!(snapshot.output, Output::Placeholder);
        assert!(!snapshot.copy_enabled);
        assert!(!snapshot.generate_enabled);
        assert!(!snapshot.success_marker);
        assert!(!snapshot.error_marker);
    }
}
