//! 音频转码适配器

mod ffmpeg_transcoder;
mod symphonia_transcoder;

pub use ffmpeg_transcoder::FfmpegTranscoder;
pub use symphonia_transcoder::SymphoniaTranscoder;
