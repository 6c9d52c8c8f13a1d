//! Audio Transcoder Port - 音频转码抽象
//!
//! 将任意上传音频转为识别接口要求的裸 PCM（s16le，16kHz，单声道）

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

use crate::domain::speech::{PCM_BITS_PER_SAMPLE, PCM_CHANNELS, PCM_SAMPLE_RATE};

/// 转码错误
#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Decoding error: {0}")]
    DecodingError(String),

    #[error("Transcoder process failed: {0}")]
    ProcessFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for TranscodeError {
    fn from(err: std::io::Error) -> Self {
        TranscodeError::IoError(err.to_string())
    }
}

/// 转码后的 PCM 信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcmInfo {
    /// 采样率
    pub sample_rate: u32,
    /// 声道数
    pub channels: u16,
    /// PCM 数据大小（字节）
    pub data_size: u64,
    /// 时长（毫秒）
    pub duration_ms: u64,
}

impl PcmInfo {
    /// 按识别接口的固定格式由字节数推算
    pub fn from_byte_len(data_size: u64) -> Self {
        let bytes_per_second =
            PCM_SAMPLE_RATE as u64 * PCM_CHANNELS as u64 * (PCM_BITS_PER_SAMPLE / 8) as u64;
        Self {
            sample_rate: PCM_SAMPLE_RATE,
            channels: PCM_CHANNELS,
            data_size,
            duration_ms: data_size * 1000 / bytes_per_second,
        }
    }
}

/// Audio Transcoder Port
#[async_trait]
pub trait AudioTranscoderPort: Send + Sync {
    /// 将 `input` 转码为裸 PCM 并写入 `output`
    ///
    /// 解码结果为空时返回 `InvalidInput`。
    async fn transcode_to_pcm(&self, input: &Path, output: &Path)
        -> Result<PcmInfo, TranscodeError>;

    /// 转码器名称（用于日志）
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pcm_info_duration() {
        let info = PcmInfo::from_byte_len(32_000);
        assert_eq!(info.sample_rate, 16_000);
        assert_eq!(info.channels, 1);
        assert_eq!(info.duration_ms, 1000);

        assert_eq!(PcmInfo::from_byte_len(1280).duration_ms, 40);
    }
}
