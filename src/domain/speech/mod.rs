//! Speech Context - 语音桥接限界上下文
//!
//! 职责:
//! - 合成参数（音色、语速、音量、音调）
//! - 识别参数（语言、领域、口音）
//! - 桥接会话状态机
//! - 流式帧归约（文本片段 / 音频片段的有序拼接）

mod errors;
mod reducer;
mod session;
mod value_objects;

pub use errors::SpeechError;
pub use reducer::{
    AudioAccumulator, RecognitionEvent, Step, SynthesisEvent, TranscriptAccumulator,
};
pub use session::{BridgeSession, SessionPhase};
pub use value_objects::{
    Prosody, ProsodyLevel, RecognitionOptions, VoiceName, PCM_BITS_PER_SAMPLE, PCM_CHANNELS,
    PCM_SAMPLE_RATE,
};
