//! 配置模块

mod app_config;

pub use app_config::{apply_env_overrides, get_config, AppConfig};
