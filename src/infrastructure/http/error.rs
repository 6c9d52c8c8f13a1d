//! HTTP Error Handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::ApplicationError;

/// 桥接失败时的统一摘要
const PROCESSING_FAILED: &str = "Failed to process request";

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    /// 400：请求缺少音频或文本
    BadRequest(String),
    /// 500：转码、临时文件、调试音频等本地失败
    Internal(String),
    /// 502：讯飞返回错误码或连接异常
    BadGateway(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::BadRequest(msg) => {
                tracing::warn!(status = status.as_u16(), error = %msg, "Bad request");
                ErrorResponse {
                    error: msg,
                    details: None,
                }
            }
            ApiError::Internal(details) => {
                tracing::error!(status = status.as_u16(), error = %details, "Internal server error");
                ErrorResponse {
                    error: PROCESSING_FAILED.to_string(),
                    details: Some(details),
                }
            }
            ApiError::BadGateway(details) => {
                tracing::error!(status = status.as_u16(), error = %details, "Upstream speech service failed");
                ErrorResponse {
                    error: PROCESSING_FAILED.to_string(),
                    details: Some(details),
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::ValidationError(msg) => ApiError::BadRequest(msg),
            ApplicationError::VendorError { .. } | ApplicationError::TransportError(_) => {
                ApiError::BadGateway(e.to_string())
            }
            ApplicationError::TranscodeFailed(_)
            | ApplicationError::StorageError(_)
            | ApplicationError::InternalError(_) => ApiError::Internal(e.to_string()),
        }
    }
}
