//! Data Transfer Objects

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::SynthesizeSpeech;

// ============================================================================
// 听写
// ============================================================================

#[derive(Debug, Serialize)]
pub struct TranscribeResponse {
    pub transcript: String,
}

// ============================================================================
// 合成
// ============================================================================

/// 合成请求体
///
/// 韵律参数保留原始 JSON 值：只有数值才生效，其余按缺省处理。
/// `debug` 按真值判断：null、false、0、空字符串视为关闭。
#[derive(Debug, Default, Deserialize)]
pub struct SynthesisRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub voice: Option<String>,
    #[serde(default)]
    pub speed: Option<Value>,
    #[serde(default)]
    pub volume: Option<Value>,
    #[serde(default)]
    pub pitch: Option<Value>,
    #[serde(default)]
    pub debug: Option<Value>,
}

fn numeric(value: Option<Value>) -> Option<f64> {
    value.as_ref().and_then(Value::as_f64)
}

fn truthy(value: Option<Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => flag,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

impl From<SynthesisRequest> for SynthesizeSpeech {
    fn from(req: SynthesisRequest) -> Self {
        Self {
            text: req.text,
            voice: req.voice.filter(|v| !v.trim().is_empty()),
            speed: numeric(req.speed),
            volume: numeric(req.volume),
            pitch: numeric(req.pitch),
            debug: truthy(req.debug),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_numeric_prosody_is_dropped() {
        let req: SynthesisRequest = serde_json::from_str(
            r#"{"text": "你好", "speed": "fast", "volume": 80, "pitch": null}"#,
        )
        .unwrap();
        let command = SynthesizeSpeech::from(req);

        assert_eq!(command.text.as_deref(), Some("你好"));
        assert_eq!(command.speed, None);
        assert_eq!(command.volume, Some(80.0));
        assert_eq!(command.pitch, None);
        assert!(!command.debug);
    }

    #[test]
    fn test_debug_flag_by_truthiness() {
        let cases = [
            (r#"{"text": "你好", "debug": null}"#, false),
            (r#"{"text": "你好", "debug": false}"#, false),
            (r#"{"text": "你好", "debug": 0}"#, false),
            (r#"{"text": "你好", "debug": ""}"#, false),
            (r#"{"text": "你好"}"#, false),
            (r#"{"debug": true}"#, true),
            (r#"{"debug": 1}"#, true),
            (r#"{"debug": "yes"}"#, true),
        ];

        for (body, expected) in cases {
            let req: SynthesisRequest = serde_json::from_str(body).unwrap();
            assert_eq!(SynthesizeSpeech::from(req).debug, expected, "{}", body);
        }
    }

    #[test]
    fn test_blank_voice_falls_back() {
        let req: SynthesisRequest =
            serde_json::from_str(r#"{"text": "a", "voice": "  ", "debug": true}"#).unwrap();
        let command = SynthesizeSpeech::from(req);

        assert_eq!(command.voice, None);
        assert!(command.debug);
    }
}
