//! 讯飞流式接口帧格式
//!
//! 听写 (iat) 与合成 (tts) 的请求帧、响应帧定义，
//! 以及响应帧到领域事件的转换。音频一律 base64 后放入 JSON。

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::domain::speech::{
    Prosody, RecognitionEvent, RecognitionOptions, SpeechError, SynthesisEvent, VoiceName,
};

/// 帧状态：首帧 / 中间帧 / 尾帧
pub const STATUS_FIRST: u8 = 0;
pub const STATUS_CONTINUE: u8 = 1;
pub const STATUS_LAST: u8 = 2;

const IAT_AUDIO_FORMAT: &str = "audio/L16;rate=16000";
const IAT_AUDIO_ENCODING: &str = "raw";

// ============================================================================
// 听写请求
// ============================================================================

#[derive(Debug, Serialize)]
pub struct IatCommon {
    pub app_id: String,
}

#[derive(Debug, Serialize)]
pub struct IatBusiness {
    pub language: String,
    pub domain: String,
    pub accent: String,
}

#[derive(Debug, Serialize)]
pub struct IatData {
    pub status: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
}

/// 听写请求帧
#[derive(Debug, Serialize)]
pub struct IatRequestFrame {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common: Option<IatCommon>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business: Option<IatBusiness>,
    pub data: IatData,
}

/// 将 PCM 切分为听写请求帧
///
/// 首帧携带 app_id 与业务参数，之后每帧 status=1，
/// 最后追加一个只有 status=2 的结束帧。
pub fn iat_frames(
    app_id: &str,
    options: &RecognitionOptions,
    pcm: &[u8],
    frame_size: usize,
) -> Vec<IatRequestFrame> {
    let mut frames: Vec<IatRequestFrame> = pcm
        .chunks(frame_size.max(1))
        .enumerate()
        .map(|(index, chunk)| {
            let first = index == 0;
            IatRequestFrame {
                common: first.then(|| IatCommon {
                    app_id: app_id.to_string(),
                }),
                business: first.then(|| IatBusiness {
                    language: options.language.clone(),
                    domain: options.domain.clone(),
                    accent: options.accent.clone(),
                }),
                data: IatData {
                    status: if first { STATUS_FIRST } else { STATUS_CONTINUE },
                    format: Some(IAT_AUDIO_FORMAT),
                    encoding: Some(IAT_AUDIO_ENCODING),
                    audio: Some(STANDARD.encode(chunk)),
                },
            }
        })
        .collect();

    frames.push(IatRequestFrame {
        common: None,
        business: None,
        data: IatData {
            status: STATUS_LAST,
            format: None,
            encoding: None,
            audio: None,
        },
    });

    frames
}

// ============================================================================
// 听写响应
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct IatCandidate {
    #[serde(default)]
    pub w: String,
}

#[derive(Debug, Deserialize)]
pub struct IatWordGroup {
    #[serde(default)]
    pub cw: Vec<IatCandidate>,
}

#[derive(Debug, Deserialize)]
pub struct IatResult {
    #[serde(default)]
    pub ws: Vec<IatWordGroup>,
}

#[derive(Debug, Deserialize)]
pub struct IatResponseData {
    pub status: Option<i64>,
    pub result: Option<IatResult>,
}

/// 听写响应帧
#[derive(Debug, Deserialize)]
pub struct IatResponseFrame {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    pub sid: Option<String>,
    pub data: Option<IatResponseData>,
}

impl IatResponseFrame {
    pub fn parse(raw: &str) -> Result<Self, SpeechError> {
        serde_json::from_str(raw).map_err(|e| SpeechError::MalformedFrame(e.to_string()))
    }

    /// 每个词组取第一个候选词，按顺序拼接
    pub fn into_event(self) -> RecognitionEvent {
        let (status, text) = match self.data {
            Some(data) => {
                let text = data.result.map(|result| {
                    result
                        .ws
                        .iter()
                        .filter_map(|group| group.cw.first())
                        .map(|candidate| candidate.w.as_str())
                        .collect::<String>()
                });
                (data.status, text)
            }
            None => (None, None),
        };

        RecognitionEvent {
            code: self.code,
            message: self.message,
            text,
            status,
        }
    }
}

// ============================================================================
// 合成请求
// ============================================================================

#[derive(Debug, Serialize)]
pub struct TtsHeader {
    pub app_id: String,
    pub status: u8,
}

#[derive(Debug, Serialize)]
pub struct TtsOral {
    pub oral_level: &'static str,
}

#[derive(Debug, Serialize)]
pub struct TtsAudioParams {
    pub encoding: &'static str,
    pub sample_rate: u32,
    pub channels: u8,
    pub bit_depth: u8,
    pub frame_size: u32,
}

#[derive(Debug, Serialize)]
pub struct TtsParams {
    pub vcn: String,
    pub speed: u8,
    pub volume: u8,
    pub pitch: u8,
    /// 背景音
    pub bgs: u8,
    pub reg: u8,
    pub rdn: u8,
    pub rhy: u8,
    pub audio: TtsAudioParams,
}

#[derive(Debug, Serialize)]
pub struct TtsParameter {
    pub oral: TtsOral,
    pub tts: TtsParams,
}

#[derive(Debug, Serialize)]
pub struct TtsText {
    pub encoding: &'static str,
    pub compress: &'static str,
    pub format: &'static str,
    pub status: u8,
    pub seq: u32,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct TtsPayload {
    pub text: TtsText,
}

/// 合成请求帧
///
/// 文本一次性发送，因此 payload.text.status 直接为 2。
#[derive(Debug, Serialize)]
pub struct TtsRequestFrame {
    pub header: TtsHeader,
    pub parameter: TtsParameter,
    pub payload: TtsPayload,
}

impl TtsRequestFrame {
    pub fn new(app_id: &str, text: &str, voice: &VoiceName, prosody: &Prosody) -> Self {
        Self {
            header: TtsHeader {
                app_id: app_id.to_string(),
                status: STATUS_FIRST,
            },
            parameter: TtsParameter {
                oral: TtsOral { oral_level: "mid" },
                tts: TtsParams {
                    vcn: voice.as_str().to_string(),
                    speed: prosody.speed.value(),
                    volume: prosody.volume.value(),
                    pitch: prosody.pitch.value(),
                    bgs: 0,
                    reg: 0,
                    rdn: 0,
                    rhy: 0,
                    audio: TtsAudioParams {
                        encoding: "lame",
                        sample_rate: 24_000,
                        channels: 1,
                        bit_depth: 16,
                        frame_size: 0,
                    },
                },
            },
            payload: TtsPayload {
                text: TtsText {
                    encoding: "utf8",
                    compress: "raw",
                    format: "plain",
                    status: STATUS_LAST,
                    seq: 0,
                    text: STANDARD.encode(text.as_bytes()),
                },
            },
        }
    }
}

// ============================================================================
// 合成响应
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct TtsResponseHeader {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    pub sid: Option<String>,
    pub status: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct TtsResponseAudio {
    pub audio: Option<String>,
    pub seq: Option<i64>,
    pub status: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct TtsResponsePayload {
    pub audio: Option<TtsResponseAudio>,
}

/// 合成响应帧
#[derive(Debug, Deserialize)]
pub struct TtsResponseFrame {
    pub header: Option<TtsResponseHeader>,
    pub payload: Option<TtsResponsePayload>,
}

impl TtsResponseFrame {
    pub fn parse(raw: &str) -> Result<Self, SpeechError> {
        serde_json::from_str(raw).map_err(|e| SpeechError::MalformedFrame(e.to_string()))
    }

    /// 缺少 header 的消息按成功的中间帧处理
    pub fn into_event(self) -> Result<SynthesisEvent, SpeechError> {
        let audio = self
            .payload
            .and_then(|payload| payload.audio)
            .and_then(|audio| audio.audio)
            .map(|encoded| {
                STANDARD
                    .decode(encoded.as_bytes())
                    .map_err(|e| SpeechError::MalformedFrame(format!("Invalid audio base64: {}", e)))
            })
            .transpose()?;

        let (code, message, status) = match self.header {
            Some(header) => (header.code, header.message, header.status),
            None => (0, String::new(), None),
        };

        Ok(SynthesisEvent {
            code,
            message,
            audio,
            status,
        })
    }
}
