//! 健康检查与根路径端点

use axum::{routing::get, Json, Router};

use crate::models::{HealthResponse, IndexResponse};
use crate::state::AppState;
use std::sync::Arc;

/// 健康检查处理器
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// 根路径：列出可用端点
async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        message: "Mediscript API is running".to_string(),
        endpoints: ["/health", "/api/health", "/api/generate"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    })
}

/// 创建健康检查路由
pub fn health_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/api/health", get(health_check))
}
