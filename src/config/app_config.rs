//! 应用配置管理
//!
//! 配置按三层叠加：内置默认值、可执行文件同级的 `config.json`、环境变量。
//! 使用全局单例管理配置状态。

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::warn;

/// 获取配置文件路径
fn get_config_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("config.json")
}

/// 应用配置结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// OpenAI API 密钥
    #[serde(default)]
    pub api_key: String,

    /// LLM API 基础 URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// 模型名称
    #[serde(default = "default_model")]
    pub model: String,

    /// 温度参数 (0.0 - 2.0)
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// top_p 参数
    #[serde(default = "default_top_p")]
    pub top_p: f64,

    /// 最大 token 数
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// 服务监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 服务监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 客户端访问的 MediScript API 地址
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// 客户端请求超时（秒），0 表示不设超时
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f64 {
    0.3
}

fn default_top_p() -> f64 {
    0.9
}

fn default_max_tokens() -> u32 {
    1200
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_api_base() -> String {
    "https://mediscript-ai.onrender.com".to_string()
}

fn default_request_timeout_secs() -> u64 {
    120
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_tokens: default_max_tokens(),
            host: default_host(),
            port: default_port(),
            api_base: default_api_base(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// 全局配置单例
static CONFIG: Lazy<RwLock<AppConfig>> = Lazy::new(|| RwLock::new(load_config()));

/// 从文件加载配置
fn load_config_from_file() -> Option<AppConfig> {
    let path = get_config_path();
    if path.exists() {
        let content = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!("Ignoring malformed {}: {}", path.display(), e);
                None
            }
        }
    } else {
        None
    }
}

/// 加载完整配置（文件 + 环境变量）
fn load_config() -> AppConfig {
    let mut config = load_config_from_file().unwrap_or_default();
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config
}

/// 用环境变量覆盖配置
///
/// 无法解析的数值变量会被忽略并记录警告。
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(api_key) = get("OPENAI_API_KEY") {
        config.api_key = api_key;
    }
    if let Some(base_url) = get("OPENAI_BASE_URL") {
        config.base_url = base_url;
    }
    if let Some(model) = get("MEDISCRIPT_MODEL") {
        config.model = model;
    }
    if let Some(host) = get("HOST") {
        config.host = host;
    }
    if let Some(port) = get("PORT") {
        match port.trim().parse() {
            Ok(port) => config.port = port,
            Err(_) => warn!("Ignoring invalid PORT value: {}", port),
        }
    }
    if let Some(api_base) = get("MEDISCRIPT_API_BASE") {
        config.api_base = api_base;
    }
    if let Some(timeout) = get("MEDISCRIPT_REQUEST_TIMEOUT_SECS") {
        match timeout.trim().parse() {
            Ok(secs) => config.request_timeout_secs = secs,
            Err(_) => warn!("Ignoring invalid MEDISCRIPT_REQUEST_TIMEOUT_SECS value: {}", timeout),
        }
    }
}

/// 获取当前配置（克隆）
pub fn get_config() -> AppConfig {
    CONFIG.read().clone()
}
