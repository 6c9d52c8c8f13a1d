//! Fixture Synthesizer - 调试用合成器
//!
//! 始终返回配置的固定 MP3 文件，不签名、不联网

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::application::ports::{SpeechSynthesizerPort, SynthesizeRequest, SynthesizeResponse};
use crate::domain::speech::SpeechError;

/// 调试合成器
///
/// 每次请求都重新读取文件，文件可以在运行期间替换。
#[derive(Debug, Clone)]
pub struct FixtureSpeechSynthesizer {
    fixture_path: PathBuf,
}

impl FixtureSpeechSynthesizer {
    pub fn new(fixture_path: impl Into<PathBuf>) -> Self {
        Self {
            fixture_path: fixture_path.into(),
        }
    }

    pub fn fixture_path(&self) -> &Path {
        &self.fixture_path
    }
}

#[async_trait]
impl SpeechSynthesizerPort for FixtureSpeechSynthesizer {
    async fn synthesize(
        &self,
        request: SynthesizeRequest,
    ) -> Result<SynthesizeResponse, SpeechError> {
        let audio_data = tokio::fs::read(&self.fixture_path).await.map_err(|e| {
            SpeechError::Io(format!("{}: {}", self.fixture_path.display(), e))
        })?;

        tracing::debug!(
            path = %self.fixture_path.display(),
            voice = %request.voice,
            audio_size = audio_data.len(),
            "Returning fixture audio"
        );

        Ok(SynthesizeResponse {
            audio_data,
            chunks: 1,
        })
    }
}
