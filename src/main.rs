//! MediScript AI - API 服务
//!
//! 使用 axum 框架构建的后端服务，提供健康检查和临床文档生成接口。

use anyhow::Context;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mediscript::api::create_api_routes;
use mediscript::config::get_config;
use mediscript::services::LlmService;
use mediscript::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 需要在读取配置之前加载
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mediscript=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting MediScript API...");

    let config = get_config();
    let generator = LlmService::from_config(&config);
    if !generator.is_configured() {
        warn!("OPENAI_API_KEY is not set; /api/generate will return errors");
    }
    let state = Arc::new(AppState::new(Arc::new(generator)));

    // 允许所有来源，浏览器前端与 API 不同源
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(create_api_routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", config.host, config.port))?;
    info!("Server listening on: {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
