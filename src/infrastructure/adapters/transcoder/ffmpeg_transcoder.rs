//! FFmpeg Transcoder - 调用外部 ffmpeg 转码

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::application::ports::{AudioTranscoderPort, PcmInfo, TranscodeError};
use crate::domain::speech::{PCM_CHANNELS, PCM_SAMPLE_RATE};

/// ffmpeg 转码器
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    binary: PathBuf,
}

impl FfmpegTranscoder {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn command(&self, input: &Path, output: &Path) -> Command {
        let mut command = Command::new(&self.binary);
        // 输出文件已由临时存储预先创建，需要 -y 覆盖
        command
            .arg("-y")
            .arg("-loglevel")
            .arg("error")
            .arg("-i")
            .arg(input)
            .arg("-ar")
            .arg(PCM_SAMPLE_RATE.to_string())
            .arg("-ac")
            .arg(PCM_CHANNELS.to_string())
            .arg("-f")
            .arg("s16le")
            .arg("-acodec")
            .arg("pcm_s16le")
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

#[async_trait]
impl AudioTranscoderPort for FfmpegTranscoder {
    async fn transcode_to_pcm(
        &self,
        input: &Path,
        output: &Path,
    ) -> Result<PcmInfo, TranscodeError> {
        let result = self.command(input, output).output().await.map_err(|e| {
            TranscodeError::ProcessFailed(format!(
                "Failed to spawn {}: {}",
                self.binary.display(),
                e
            ))
        })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(TranscodeError::ProcessFailed(format!(
                "ffmpeg exited with {}: {}",
                result.status,
                stderr.trim()
            )));
        }

        let data_size = tokio::fs::metadata(output).await?.len();
        if data_size == 0 {
            return Err(TranscodeError::InvalidInput(
                "Audio decoded to zero samples".to_string(),
            ));
        }

        let info = PcmInfo::from_byte_len(data_size);
        tracing::debug!(
            pcm_size = info.data_size,
            duration_ms = info.duration_ms,
            "Audio transcoded by ffmpeg"
        );

        Ok(info)
    }

    fn name(&self) -> &'static str {
        "ffmpeg"
    }
}
