//! 与 MediScript API 通信的传输层
//!
//! `Transport` 只负责收发，返回原始状态码和响应体；
//! 状态码和信封的判定由控制器完成。

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::llm::fix_base_url;

/// 健康检查端点
pub const HEALTH_PATH: &str = "/api/health";

/// 生成端点
pub const GENERATE_PATH: &str = "/api/generate";

/// 原始 HTTP 响应
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx 视为成功
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 传输错误（网络不可达、超时等）
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Connection(String),
}

/// 传输层抽象
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET 请求
    async fn get(&self, path: &str) -> Result<RawResponse, TransportError>;

    /// 以 JSON 请求体发送 POST 请求
    async fn post_json(&self, path: &str, body: &Value) -> Result<RawResponse, TransportError>;
}

/// 基于 reqwest 的 HTTP 传输
pub struct HttpTransport {
    client: Client,
    api_base: String,
}

impl HttpTransport {
    /// 创建 HTTP 传输
    ///
    /// `timeout` 为 None 时不限制单次请求时长。
    pub fn new(api_base: impl AsRef<str>, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = Client::builder().connect_timeout(Duration::from_secs(30));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            api_base: fix_base_url(api_base.as_ref()),
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    async fn read(response: reqwest::Response) -> Result<RawResponse, TransportError> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(RawResponse { status, body })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> Result<RawResponse, TransportError> {
        let url = self.url(path);
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        Self::read(response).await
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<RawResponse, TransportError> {
        let url = self.url(path);
        debug!("POST {}", url);
        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;
        Self::read(response).await
    }
}
