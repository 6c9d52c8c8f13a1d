//! Application State
//!
//! 两个桥接处理器彼此独立，不共享可变状态

use std::sync::Arc;

use crate::application::{
    AudioTranscoderPort, ScratchStoragePort, SpeechRecognizerPort, SpeechSynthesizerPort,
    SynthesizeSpeechHandler, TranscribeAudioHandler,
};
use crate::domain::speech::RecognitionOptions;

/// 应用状态
pub struct AppState {
    pub transcribe_handler: TranscribeAudioHandler,
    pub synthesize_handler: SynthesizeSpeechHandler,
}

/// 组装 AppState 所需的端口
pub struct AppPorts {
    pub storage: Arc<dyn ScratchStoragePort>,
    pub transcoder: Arc<dyn AudioTranscoderPort>,
    pub recognizer: Arc<dyn SpeechRecognizerPort>,
    pub synthesizer: Arc<dyn SpeechSynthesizerPort>,
    /// 调试模式的固定音频
    pub fixture: Arc<dyn SpeechSynthesizerPort>,
}

impl AppState {
    pub fn new(ports: AppPorts, options: RecognitionOptions, default_voice: &str) -> Self {
        Self {
            transcribe_handler: TranscribeAudioHandler::new(
                ports.storage,
                ports.transcoder,
                ports.recognizer,
                options,
            ),
            synthesize_handler: SynthesizeSpeechHandler::new(
                ports.synthesizer,
                ports.fixture,
                default_voice,
            ),
        }
    }
}
