//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_transcoder;
mod scratch_storage;
mod speech_recognizer;
mod speech_synthesizer;

pub use audio_transcoder::{AudioTranscoderPort, PcmInfo, TranscodeError};
pub use scratch_storage::{ScratchFile, ScratchStoragePort, StorageError};
pub use speech_recognizer::{RecognizeRequest, RecognizeResponse, SpeechRecognizerPort};
pub use speech_synthesizer::{SpeechSynthesizerPort, SynthesizeRequest, SynthesizeResponse};
