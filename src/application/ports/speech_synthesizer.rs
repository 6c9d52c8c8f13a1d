//! Speech Synthesizer Port - 语音合成抽象
//!
//! 定义合成的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;

use crate::domain::speech::{Prosody, SpeechError, VoiceName};

/// 合成请求
#[derive(Debug, Clone)]
pub struct SynthesizeRequest {
    /// 要合成的文本内容
    pub text: String,
    /// 发音人
    pub voice: VoiceName,
    /// 语速 / 音量 / 音调
    pub prosody: Prosody,
}

/// 合成结果
#[derive(Debug, Clone)]
pub struct SynthesizeResponse {
    /// 完整音频（MP3）
    pub audio_data: Vec<u8>,
    /// 收到的音频片段数
    pub chunks: usize,
}

/// Speech Synthesizer Port
#[async_trait]
pub trait SpeechSynthesizerPort: Send + Sync {
    async fn synthesize(&self, request: SynthesizeRequest)
        -> Result<SynthesizeResponse, SpeechError>;
}
