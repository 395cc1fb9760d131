//! 系统剪贴板

use parking_lot::Mutex;
use std::io::Write;
use std::process::{Command, Stdio};
use tracing::debug;

/// 剪贴板错误
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write to {program}: {source}")]
    Write {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    CommandFailed { program: String, status: String },

    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
}

/// 剪贴板抽象
pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// 内存剪贴板
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// 最近一次写入的内容
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        *self.contents.lock() = Some(text.to_string());
        Ok(())
    }
}

/// 通过平台命令写入剪贴板（pbcopy / clip / wl-copy / xclip）
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// 按当前平台选择剪贴板命令
    pub fn detect() -> Self {
        if cfg!(target_os = "macos") {
            Self::new("pbcopy", Vec::new())
        } else if cfg!(windows) {
            Self::new("clip", Vec::new())
        } else if std::env::var_os("WAYLAND_DISPLAY").is_some() {
            Self::new("wl-copy", Vec::new())
        } else {
            Self::new("xclip", vec!["-selection".to_string(), "clipboard".to_string()])
        }
    }
}

impl Clipboard for CommandClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        debug!("Copying {} chars via {}", text.chars().count(), self.program);

        let spawn_err = |source| ClipboardError::Spawn {
            program: self.program.clone(),
            source,
        };

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(spawn_err)?;

        // stdin 在写入后立即关闭，子进程才能读到 EOF
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin
                .write_all(text.as_bytes())
                .map_err(|source| ClipboardError::Write {
                    program: self.program.clone(),
                    source,
                }),
            None => Err(ClipboardError::Unavailable("stdin not captured".to_string())),
        };

        // 写入失败也要回收子进程
        let status = child.wait();
        written?;
        let status = status.map_err(spawn_err)?;

        if status.success() {
            Ok(())
        } else {
            Err(ClipboardError::CommandFailed {
                program: self.program.clone(),
                status: status.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_clipboard() {
        let clipboard = MemoryClipboard::new();
        assert_eq!(clipboard.contents(), None);

        clipboard.write_text("Dx: MI").unwrap();
        assert_eq!(clipboard.contents().as_deref(), Some("Dx: MI"));
    }

    #[cfg(unix)]
    #[test]
    fn test_command_exiting_early_reports_write_error() {
        // `true` 不读 stdin 就退出；超过管道缓冲区的写入必然失败
        let clipboard = CommandClipboard::new("true", Vec::new());
        let text = "x".repeat(4 * 1024 * 1024);

        let err = clipboard.write_text(&text).unwrap_err();
        assert!(matches!(err, ClipboardError::Write { .. }), "unexpected error: {err}");
    }

    #[test]
    fn test_missing_command_fails_to_spawn() {
        let clipboard = CommandClipboard::new("mediscript-no-such-clipboard-tool", Vec::new());
        let err = clipboard.write_text("text").unwrap_err();
        assert!(matches!(err, ClipboardError::Spawn { .. }));
    }
}
