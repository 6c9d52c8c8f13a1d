//! Symphonia Transcoder - 进程内音频转码
//!
//! 解码 MP3 / WAV / FLAC / OGG Vorbis，
//! 混为单声道并线性重采样到 16kHz，输出 s16le 裸 PCM。

use async_trait::async_trait;
use std::fs::File;
use std::path::{Path, PathBuf};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::application::ports::{AudioTranscoderPort, PcmInfo, TranscodeError};
use crate::domain::speech::PCM_SAMPLE_RATE;

/// 解码后的单声道样本
struct MonoAudio {
    samples: Vec<f32>,
    sample_rate: u32,
}

/// 基于 symphonia 的转码器
#[derive(Debug, Default, Clone)]
pub struct SymphoniaTranscoder;

impl SymphoniaTranscoder {
    pub fn new() -> Self {
        Self
    }

    fn transcode_blocking(input: &Path, output: &Path) -> Result<PcmInfo, TranscodeError> {
        let decoded = decode_to_mono(input)?;
        if decoded.samples.is_empty() {
            return Err(TranscodeError::InvalidInput(
                "Audio decoded to zero samples".to_string(),
            ));
        }

        let resampled = resample(&decoded.samples, decoded.sample_rate, PCM_SAMPLE_RATE);
        let pcm = to_s16le(&resampled);
        std::fs::write(output, &pcm)?;

        Ok(PcmInfo::from_byte_len(pcm.len() as u64))
    }
}

fn decode_to_mono(input: &Path) -> Result<MonoAudio, TranscodeError> {
    let file = File::open(input)?;
    if file.metadata()?.len() == 0 {
        return Err(TranscodeError::InvalidInput("Audio file is empty".to_string()));
    }
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = input.extension().and_then(|e| e.to_str()) {
        hint.with_extension(extension);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| TranscodeError::DecodingError(format!("Probe failed: {}", e)))?;

    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or_else(|| TranscodeError::DecodingError("No audio track found".to_string()))?;
    let track_id = track.id;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| TranscodeError::DecodingError(format!("Decoder creation failed: {}", e)))?;

    let mut sample_rate = track.codec_params.sample_rate;
    let mut samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(e) => {
                return Err(TranscodeError::DecodingError(format!(
                    "Packet read error: {}",
                    e
                )));
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(e)) => {
                tracing::warn!("Decode error (skipping packet): {}", e);
                continue;
            }
            Err(e) => {
                return Err(TranscodeError::DecodingError(format!("Decode failed: {}", e)));
            }
        };

        let spec = *decoded.spec();
        sample_rate.get_or_insert(spec.rate);
        let channels = spec.channels.count().max(1);

        let mut sample_buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);

        // 多声道取平均
        samples.extend(
            sample_buf
                .samples()
                .chunks(channels)
                .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32),
        );
    }

    let sample_rate = sample_rate
        .ok_or_else(|| TranscodeError::DecodingError("Unknown sample rate".to_string()))?;

    Ok(MonoAudio {
        samples,
        sample_rate,
    })
}

/// 单声道线性插值重采样
fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = to_rate as f64 / from_rate as f64;
    let last = samples.len() - 1;
    let new_len = (samples.len() as f64 * ratio) as usize;

    (0..new_len)
        .map(|i| {
            let src_pos = i as f64 / ratio;
            let src_idx = (src_pos as usize).min(last);
            let frac = (src_pos - src_idx as f64) as f32;

            let s0 = samples[src_idx];
            let s1 = samples[(src_idx + 1).min(last)];
            s0 + (s1 - s0) * frac
        })
        .collect()
}

fn to_s16le(samples: &[f32]) -> Vec<u8> {
    samples
        .iter()
        .flat_map(|&s| ((s.clamp(-1.0, 1.0) * 32767.0) as i16).to_le_bytes())
        .collect()
}

#[async_trait]
impl AudioTranscoderPort for SymphoniaTranscoder {
    async fn transcode_to_pcm(
        &self,
        input: &Path,
        output: &Path,
    ) -> Result<PcmInfo, TranscodeError> {
        let input: PathBuf = input.to_path_buf();
        let output: PathBuf = output.to_path_buf();

        let info = tokio::task::spawn_blocking(move || Self::transcode_blocking(&input, &output))
            .await
            .map_err(|e| TranscodeError::DecodingError(format!("Transcode task failed: {}", e)))??;

        tracing::debug!(
            pcm_size = info.data_size,
            duration_ms = info.duration_ms,
            "Audio transcoded by symphonia"
        );

        Ok(info)
    }

    fn name(&self) -> &'static str {
        "symphonia"
    }
}
