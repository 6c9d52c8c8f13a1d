//! Transcribe Command Handler
//!
//! 上传音频 -> 临时文件 -> PCM -> 讯飞听写 -> 文本

use std::path::Path;
use std::sync::Arc;

use crate::application::commands::TranscribeAudio;
use crate::application::error::ApplicationError;
use crate::application::ports::{
    AudioTranscoderPort, RecognizeRequest, ScratchFile, ScratchStoragePort, SpeechRecognizerPort,
};
use crate::domain::speech::RecognitionOptions;

/// 上传文件缺少可用扩展名时按 MP3 处理
const DEFAULT_UPLOAD_EXTENSION: &str = "mp3";

/// 听写响应
#[derive(Debug, Clone)]
pub struct TranscribeAudioResponse {
    pub transcript: String,
    pub fragments: usize,
    pub duration_ms: u64,
}

/// TranscribeAudio Handler
pub struct TranscribeAudioHandler {
    storage: Arc<dyn ScratchStoragePort>,
    transcoder: Arc<dyn AudioTranscoderPort>,
    recognizer: Arc<dyn SpeechRecognizerPort>,
    options: RecognitionOptions,
}

impl TranscribeAudioHandler {
    pub fn new(
        storage: Arc<dyn ScratchStoragePort>,
        transcoder: Arc<dyn AudioTranscoderPort>,
        recognizer: Arc<dyn SpeechRecognizerPort>,
        options: RecognitionOptions,
    ) -> Self {
        Self {
            storage,
            transcoder,
            recognizer,
            options,
        }
    }

    /// 执行听写
    ///
    /// 两个临时文件在任何退出路径上都会被删除。
    pub async fn handle(
        &self,
        command: TranscribeAudio,
    ) -> Result<TranscribeAudioResponse, ApplicationError> {
        if command.audio_data.is_empty() {
            return Err(ApplicationError::validation("Audio file is required"));
        }

        let suffix = format!(".{}", upload_extension(command.file_name.as_deref()));
        let upload = self.storage.create("upload-", &suffix)?;
        let converted = self.storage.create("converted-", ".pcm")?;

        let result = self
            .transcribe(&command.audio_data, &upload, &converted)
            .await;

        upload.cleanup();
        converted.cleanup();

        result
    }

    async fn transcribe(
        &self,
        audio_data: &[u8],
        upload: &ScratchFile,
        converted: &ScratchFile,
    ) -> Result<TranscribeAudioResponse, ApplicationError> {
        tokio::fs::write(upload.path(), audio_data)
            .await
            .map_err(|e| ApplicationError::StorageError(format!("Failed to save upload: {}", e)))?;

        tracing::debug!(
            path = %upload.path().display(),
            size = audio_data.len(),
            "Upload saved"
        );

        let pcm = self
            .transcoder
            .transcode_to_pcm(upload.path(), converted.path())
            .await?;

        tracing::info!(
            transcoder = self.transcoder.name(),
            pcm_size = pcm.data_size,
            duration_ms = pcm.duration_ms,
            "Audio transcoded to PCM"
        );

        let response = self
            .recognizer
            .recognize(RecognizeRequest {
                pcm_path: converted.path().to_path_buf(),
                options: self.options.clone(),
            })
            .await?;

        tracing::info!(
            fragments = response.fragments,
            frames_sent = response.frames_sent,
            transcript_len = response.transcript.chars().count(),
            "Transcription completed"
        );

        Ok(TranscribeAudioResponse {
            transcript: response.transcript,
            fragments: response.fragments,
            duration_ms: pcm.duration_ms,
        })
    }
}

/// 从上传文件名推断扩展名
fn upload_extension(file_name: Option<&str>) -> String {
    file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_else(|| DEFAULT_UPLOAD_EXTENSION.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    use crate::application::ports::{PcmInfo, RecognizeResponse, TranscodeError};
    use crate::domain::speech::SpeechError;
    use crate::infrastructure::adapters::TempFileStore;

    struct FakeTranscoder {
        fail: bool,
        calls: AtomicUsize,
    }

    impl FakeTranscoder {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl AudioTranscoderPort for FakeTranscoder {
        async fn transcode_to_pcm(
            &self,
            input: &Path,
            output: &Path,
        ) -> Result<PcmInfo, TranscodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert!(input.exists());
            if self.fail {
                return Err(TranscodeError::DecodingError("unsupported codec".to_string()));
            }
            let pcm = vec![0u8; 3200];
            tokio::fs::write(output, &pcm).await?;
            Ok(PcmInfo::from_byte_len(pcm.len() as u64))
        }

        fn name(&self) -> &'static str {
            "fake"
        }
    }

    struct FakeRecognizer {
        vendor_error: Option<i64>,
        calls: AtomicUsize,
    }

    impl FakeRecognizer {
        fn new(vendor_error: Option<i64>) -> Self {
            Self {
                vendor_error,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SpeechRecognizerPort for FakeRecognizer {
        async fn recognize(
            &self,
            request: RecognizeRequest,
        ) -> Result<RecognizeResponse, SpeechError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert!(request.pcm_path.exists());
            if let Some(code) = self.vendor_error {
                return Err(SpeechError::vendor(code, "engine error"));
            }
            Ok(RecognizeResponse {
                transcript: "您好".to_string(),
                fragments: 2,
                frames_sent: 4,
            })
        }
    }

    struct Fixture {
        dir: TempDir,
        transcoder: Arc<FakeTranscoder>,
        recognizer: Arc<FakeRecognizer>,
        handler: TranscribeAudioHandler,
    }

    fn fixture(transcode_fails: bool, vendor_error: Option<i64>) -> Fixture {
        let dir = TempDir::new().unwrap();
        let storage = Arc::new(TempFileStore::new(dir.path()).unwrap());
        let transcoder = Arc::new(FakeTranscoder::new(transcode_fails));
        let recognizer = Arc::new(FakeRecognizer::new(vendor_error));
        let handler = TranscribeAudioHandler::new(
            storage,
            transcoder.clone(),
            recognizer.clone(),
            RecognitionOptions::default(),
        );
        Fixture {
            dir,
            transcoder,
            recognizer,
            handler,
        }
    }

    fn leftover_files(dir: &TempDir) -> usize {
        std::fs::read_dir(dir.path()).unwrap().count()
    }

    fn upload(data: &[u8]) -> TranscribeAudio {
        TranscribeAudio {
            audio_data: data.to_vec(),
            file_name: Some("answer.mp3".to_string()),
        }
    }

    #[tokio::test]
    async fn test_transcribe_success_removes_scratch_files() {
        let f = fixture(false, None);

        let response = f.handler.handle(upload(b"ID3fake-mp3")).await.unwrap();

        assert_eq!(response.transcript, "您好");
        assert_eq!(response.fragments, 2);
        assert_eq!(response.duration_ms, 100);
        assert_eq!(leftover_files(&f.dir), 0);
    }

    #[tokio::test]
    async fn test_missing_audio_never_reaches_vendor() {
        let f = fixture(false, None);

        let err = f.handler.handle(upload(b"")).await.unwrap_err();

        assert!(matches!(err, ApplicationError::ValidationError(_)));
        assert_eq!(f.transcoder.calls.load(Ordering::SeqCst), 0);
        assert_eq!(f.recognizer.calls.load(Ordering::SeqCst), 0);
        assert_eq!(leftover_files(&f.dir), 0);
    }

    #[tokio::test]
    async fn test_transcode_failure_is_fatal_and_cleans_up() {
        let f = fixture(true, None);

        let err = f.handler.handle(upload(b"garbage")).await.unwrap_err();

        assert!(matches!(err, ApplicationError::TranscodeFailed(_)));
        assert_eq!(f.recognizer.calls.load(Ordering::SeqCst), 0);
        assert_eq!(leftover_files(&f.dir), 0);
    }

    #[tokio::test]
    async fn test_vendor_error_cleans_up() {
        let f = fixture(false, Some(10105));

        let err = f.handler.handle(upload(b"ID3fake-mp3")).await.unwrap_err();

        assert!(matches!(err, ApplicationError::VendorError { code: 10105, .. }));
        assert_eq!(leftover_files(&f.dir), 0);
    }

    #[test]
    fn test_upload_extension() {
        assert_eq!(upload_extension(Some("a.WAV")), "wav");
        assert_eq!(upload_extension(Some("recording.webm")), "webm");
        assert_eq!(upload_extension(Some("blob")), "mp3");
        assert_eq!(upload_extension(Some("x.../../etc")), "mp3");
        assert_eq!(upload_extension(None), "mp3");
    }
}
