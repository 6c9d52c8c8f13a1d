//! Speech Context - Errors

use thiserror::Error;

use super::SessionPhase;

#[derive(Debug, Error)]
pub enum SpeechError {
    /// 讯飞返回非零错误码
    #[error("服务端错误 (code {code}): {message}")]
    Vendor { code: i64, message: String },

    #[error("连接错误: {0}")]
    Transport(String),

    #[error("连接在完成前被关闭")]
    ConnectionClosed,

    #[error("无法解析的消息帧: {0}")]
    MalformedFrame(String),

    #[error("非法的会话状态转换: {from:?} -> {to:?}")]
    InvalidTransition { from: SessionPhase, to: SessionPhase },

    #[error("等待服务端响应超时")]
    Timeout,

    #[error("读取音频失败: {0}")]
    Io(String),
}

impl SpeechError {
    pub fn vendor(code: i64, message: impl Into<String>) -> Self {
        Self::Vendor {
            code,
            message: message.into(),
        }
    }
}
