//! Synthesize Command Handler

use std::sync::Arc;

use crate::application::commands::SynthesizeSpeech;
use crate::application::error::ApplicationError;
use crate::application::ports::{SpeechSynthesizerPort, SynthesizeRequest};
use crate::domain::speech::{Prosody, VoiceName};

/// 讯飞 lame 编码输出 MP3
pub const SYNTHESIS_CONTENT_TYPE: &str = "audio/mpeg";

/// 合成响应
#[derive(Debug, Clone)]
pub struct SynthesizeSpeechResponse {
    pub audio_data: Vec<u8>,
    pub content_type: &'static str,
}

/// SynthesizeSpeech Handler
pub struct SynthesizeSpeechHandler {
    synthesizer: Arc<dyn SpeechSynthesizerPort>,
    /// 调试模式使用的本地音频
    fixture: Arc<dyn SpeechSynthesizerPort>,
    default_voice: String,
}

impl SynthesizeSpeechHandler {
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizerPort>,
        fixture: Arc<dyn SpeechSynthesizerPort>,
        default_voice: impl Into<String>,
    ) -> Self {
        Self {
            synthesizer,
            fixture,
            default_voice: default_voice.into(),
        }
    }

    pub async fn handle(
        &self,
        command: SynthesizeSpeech,
    ) -> Result<SynthesizeSpeechResponse, ApplicationError> {
        let voice = VoiceName::or_default(command.voice.as_deref(), &self.default_voice);
        let prosody = Prosody::new(command.speed, command.volume, command.pitch);

        if command.debug {
            tracing::info!("Debug synthesis requested, serving fixture audio");
            let response = self
                .fixture
                .synthesize(SynthesizeRequest {
                    text: command.text.unwrap_or_default(),
                    voice,
                    prosody,
                })
                .await?;
            return Ok(SynthesizeSpeechResponse {
                audio_data: response.audio_data,
                content_type: SYNTHESIS_CONTENT_TYPE,
            });
        }

        let text = command
            .text
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ApplicationError::validation("Text is required"))?;

        tracing::info!(
            voice = %voice,
            text_len = text.chars().count(),
            speed = prosody.speed.value(),
            volume = prosody.volume.value(),
            pitch = prosody.pitch.value(),
            "Starting speech synthesis"
        );

        let response = self
            .synthesizer
            .synthesize(SynthesizeRequest {
                text,
                voice,
                prosody,
            })
            .await?;

        tracing::info!(
            chunks = response.chunks,
            audio_size = response.audio_data.len(),
            "Speech synthesis completed"
        );

        Ok(SynthesizeSpeechResponse {
            audio_data: response.audio_data,
            content_type: SYNTHESIS_CONTENT_TYPE,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use crate::application::ports::SynthesizeResponse;
    use crate::domain::speech::SpeechError;

    #[derive(Default)]
    struct RecordingSynthesizer {
        calls: AtomicUsize,
        last: Mutex<Option<SynthesizeRequest>>,
        audio: Vec<u8>,
    }

    impl RecordingSynthesizer {
        fn returning(audio: &[u8]) -> Self {
            Self {
                audio: audio.to_vec(),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl SpeechSynthesizerPort for RecordingSynthesizer {
        async fn synthesize(
            &self,
            request: SynthesizeRequest,
        ) -> Result<SynthesizeResponse, SpeechError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(request);
            Ok(SynthesizeResponse {
                audio_data: self.audio.clone(),
                chunks: 1,
            })
        }
    }

    fn handler(
        vendor: Arc<RecordingSynthesizer>,
        fixture: Arc<RecordingSynthesizer>,
    ) -> SynthesizeSpeechHandler {
        SynthesizeSpeechHandler::new(vendor, fixture, "x5_lingfeiyi_flow")
    }

    #[tokio::test]
    async fn test_defaults_are_filled_in() {
        let vendor = Arc::new(RecordingSynthesizer::returning(b"mp3"));
        let fixture = Arc::new(RecordingSynthesizer::default());
        let handler = handler(vendor.clone(), fixture.clone());

        let response = handler
            .handle(SynthesizeSpeech {
                text: Some("测试".to_string()),
                speed: Some(80.0),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(response.audio_data, b"mp3");
        assert_eq!(response.content_type, "audio/mpeg");

        let request = vendor.last.lock().unwrap().clone().unwrap();
        assert_eq!(request.text, "测试");
        assert_eq!(request.voice.as_str(), "x5_lingfeiyi_flow");
        assert_eq!(request.prosody.speed.value(), 80);
        assert_eq!(request.prosody.volume.value(), 50);
        assert_eq!(request.prosody.pitch.value(), 50);
        assert_eq!(fixture.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_text_never_reaches_vendor() {
        let vendor = Arc::new(RecordingSynthesizer::default());
        let fixture = Arc::new(RecordingSynthesizer::default());
        let handler = handler(vendor.clone(), fixture.clone());

        for text in [None, Some(String::new()), Some("   ".to_string())] {
            let err = handler
                .handle(SynthesizeSpeech {
                    text,
                    ..Default::default()
                })
                .await
                .unwrap_err();
            assert!(matches!(err, ApplicationError::ValidationError(_)));
        }

        assert_eq!(vendor.calls.load(Ordering::SeqCst), 0);
        assert_eq!(fixture.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_debug_uses_fixture_only() {
        let vendor = Arc::new(RecordingSynthesizer::default());
        let fixture = Arc::new(RecordingSynthesizer::returning(b"fixture-bytes"));
        let handler = handler(vendor.clone(), fixture.clone());

        let response = handler
            .handle(SynthesizeSpeech {
                debug: true,
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(response.audio_data, b"fixture-bytes");
        assert_eq!(vendor.calls.load(Ordering::SeqCst), 0);
        assert_eq!(fixture.calls.load(Ordering::SeqCst), 1);
    }
}
