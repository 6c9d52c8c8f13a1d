//! 合成适配器（调试用固定音频）

mod fixture_synthesizer;

pub use fixture_synthesizer::FixtureSpeechSynthesizer;
