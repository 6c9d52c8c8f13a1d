//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（转码、听写、合成、临时存储）
//! - commands: 听写 / 合成命令及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;

// Re-exports
pub use commands::{
    handlers::{
        SynthesizeSpeechHandler, SynthesizeSpeechResponse, TranscribeAudioHandler,
        TranscribeAudioResponse, SYNTHESIS_CONTENT_TYPE,
    },
    SynthesizeSpeech, TranscribeAudio,
};

pub use error::ApplicationError;

pub use ports::{
    // Transcoder
    AudioTranscoderPort,
    PcmInfo,
    TranscodeError,
    // Scratch storage
    ScratchFile,
    ScratchStoragePort,
    StorageError,
    // Recognizer
    RecognizeRequest,
    RecognizeResponse,
    SpeechRecognizerPort,
    // Synthesizer
    SpeechSynthesizerPort,
    SynthesizeRequest,
    SynthesizeResponse,
};
