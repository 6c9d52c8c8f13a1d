//! 应用层错误定义
//!
//! 统一的命令错误类型

use thiserror::Error;

use crate::application::ports::{StorageError, TranscodeError};
use crate::domain::speech::SpeechError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 请求参数错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 音频转码失败
    #[error("Transcode failed: {0}")]
    TranscodeFailed(String),

    /// 讯飞返回错误码
    #[error("Vendor error (code {code}): {message}")]
    VendorError { code: i64, message: String },

    /// 连接层错误
    #[error("Transport error: {0}")]
    TransportError(String),

    /// 临时文件 / 调试音频读写错误
    #[error("Storage error: {0}")]
    StorageError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<SpeechError> for ApplicationError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::Vendor { code, message } => Self::VendorError { code, message },
            SpeechError::Transport(_)
            | SpeechError::ConnectionClosed
            | SpeechError::MalformedFrame(_)
            | SpeechError::Timeout => Self::TransportError(err.to_string()),
            SpeechError::Io(msg) => Self::StorageError(msg),
            SpeechError::InvalidTransition { .. } => Self::InternalError(err.to_string()),
        }
    }
}

impl From<TranscodeError> for ApplicationError {
    fn from(err: TranscodeError) -> Self {
        Self::TranscodeFailed(err.to_string())
    }
}

impl From<StorageError> for ApplicationError {
    fn from(err: StorageError) -> Self {
        Self::StorageError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_error_keeps_code_and_message() {
        let err: ApplicationError = SpeechError::vendor(10165, "invalid handle").into();
        match err {
            ApplicationError::VendorError { code, message } => {
                assert_eq!(code, 10165);
                assert_eq!(message, "invalid handle");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_transport_errors_collapse() {
        let err: ApplicationError = SpeechError::ConnectionClosed.into();
        assert!(matches!(err, ApplicationError::TransportError(_)));

        let err: ApplicationError = SpeechError::Timeout.into();
        assert!(matches!(err, ApplicationError::TransportError(_)));
    }
}
