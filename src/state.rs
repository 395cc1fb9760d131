//! 应用状态管理
//!
//! 定义在请求处理器之间共享的状态。

use std::sync::Arc;

use crate::services::NoteGenerator;

/// 应用共享状态
#[derive(Clone)]
pub struct AppState {
    /// 文档生成器
    pub generator: Arc<dyn NoteGenerator>,
}

impl AppState {
    /// 使用指定生成器创建状态
    pub fn new(generator: Arc<dyn NoteGenerator>) -> Self {
        Self { generator }
    }
}
