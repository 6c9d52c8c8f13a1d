//! Speech Recognizer Port - 语音听写抽象
//!
//! 具体实现在 infrastructure/adapters/xfyun

use async_trait::async_trait;
use std::path::PathBuf;

use crate::domain::speech::{RecognitionOptions, SpeechError};

/// 听写请求
#[derive(Debug, Clone)]
pub struct RecognizeRequest {
    /// 已转码的 PCM 文件
    pub pcm_path: PathBuf,
    /// 业务参数
    pub options: RecognitionOptions,
}

/// 听写结果
#[derive(Debug, Clone)]
pub struct RecognizeResponse {
    /// 按接收顺序拼接的完整文本
    pub transcript: String,
    /// 收到的文本片段数
    pub fragments: usize,
    /// 发送的数据帧数（含结束帧）
    pub frames_sent: usize,
}

/// Speech Recognizer Port
#[async_trait]
pub trait SpeechRecognizerPort: Send + Sync {
    async fn recognize(&self, request: RecognizeRequest) -> Result<RecognizeResponse, SpeechError>;
}
