//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping        GET   健康检查
//! - /api/transcribe  POST  上传音频，返回听写文本
//! - /api/synthesis   POST  文本合成 MP3

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/transcribe", post(handlers::transcribe))
        .route("/synthesis", post(handlers::synthesize))
}
