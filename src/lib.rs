//! MediScript AI
//!
//! 把医生的自由文本笔记转换成结构化临床文档：
//! `api` 提供 axum 服务端，`client` 是对应的无界面客户端。

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod services;
pub mod state;
