//! Speech Context - 流式帧归约
//!
//! 把服务端推送的有序消息折叠成最终结果，与传输层无关。
//! 片段只追加、不重排；收到结束标志后结果固定。

use super::SpeechError;

/// 归约进度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// 继续等待后续消息
    Continue,
    /// 已收到结束帧
    Complete,
}

/// 服务端 status 字段：最后一帧
const STATUS_LAST: i64 = 2;

/// 一条听写结果消息（已从线上格式解码）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecognitionEvent {
    pub code: i64,
    pub message: String,
    /// 本条消息识别出的文本（已按词序拼接）
    pub text: Option<String>,
    /// data.status
    pub status: Option<i64>,
}

/// 一条合成结果消息（已从线上格式解码）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynthesisEvent {
    pub code: i64,
    pub message: String,
    /// 已 base64 解码的音频片段
    pub audio: Option<Vec<u8>>,
    /// header.status
    pub status: Option<i64>,
}

/// 听写文本累加器
#[derive(Debug, Default)]
pub struct TranscriptAccumulator {
    text: String,
    fragments: usize,
    complete: bool,
}

impl TranscriptAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 应用一条消息
    ///
    /// 非零错误码直接失败，不论之前累积了多少片段。
    pub fn apply(&mut self, event: RecognitionEvent) -> Result<Step, SpeechError> {
        if self.complete {
            return Ok(Step::Complete);
        }
        if event.code != 0 {
            return Err(SpeechError::vendor(event.code, event.message));
        }

        if let Some(text) = event.text {
            self.text.push_str(&text);
            self.fragments += 1;
        }

        if event.status == Some(STATUS_LAST) {
            self.complete = true;
            return Ok(Step::Complete);
        }
        Ok(Step::Continue)
    }

    pub fn fragments(&self) -> usize {
        self.fragments
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn into_transcript(self) -> String {
        self.text
    }
}

/// 合成音频累加器
#[derive(Debug, Default)]
pub struct AudioAccumulator {
    audio: Vec<u8>,
    chunks: usize,
    complete: bool,
}

impl AudioAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 应用一条消息
    ///
    /// 结束帧本身携带的音频也会被追加。
    pub fn apply(&mut self, event: SynthesisEvent) -> Result<Step, SpeechError> {
        if self.complete {
            return Ok(Step::Complete);
        }
        if event.code != 0 {
            return Err(SpeechError::vendor(event.code, event.message));
        }

        if let Some(chunk) = event.audio {
            self.audio.extend_from_slice(&chunk);
            self.chunks += 1;
        }

        if event.status == Some(STATUS_LAST) {
            self.complete = true;
            return Ok(Step::Complete);
        }
        Ok(Step::Continue)
    }

    pub fn chunks(&self) -> usize {
        self.chunks
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn into_audio(self) -> Vec<u8> {
        self.audio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_event(text: &str, status: i64) -> RecognitionEvent {
        RecognitionEvent {
            code: 0,
            message: "success".to_string(),
            text: Some(text.to_string()),
            status: Some(status),
        }
    }

    fn audio_event(audio: &[u8], status: i64) -> SynthesisEvent {
        SynthesisEvent {
            code: 0,
            message: "success".to_string(),
            audio: Some(audio.to_vec()),
            status: Some(status),
        }
    }

    #[test]
    fn test_transcript_concatenates_in_receipt_order() {
        let mut acc = TranscriptAccumulator::new();
        assert_eq!(acc.apply(text_event("今天", 1)).unwrap(), Step::Continue);
        assert_eq!(acc.apply(text_event("天气", 1)).unwrap(), Step::Continue);
        assert_eq!(acc.apply(text_event("不错", 2)).unwrap(), Step::Complete);

        assert_eq!(acc.fragments(), 3);
        assert_eq!(acc.into_transcript(), "今天天气不错");
    }

    #[test]
    fn test_transcript_with_empty_final_fragment() {
        let mut acc = TranscriptAccumulator::new();
        acc.apply(text_event("您好", 1)).unwrap();
        assert_eq!(acc.apply(text_event("", 2)).unwrap(), Step::Complete);
        assert_eq!(acc.into_transcript(), "您好");
    }

    #[test]
    fn test_transcript_vendor_error_discards_progress() {
        let mut acc = TranscriptAccumulator::new();
        acc.apply(text_event("已经", 1)).unwrap();
        acc.apply(text_event("识别", 1)).unwrap();

        let err = acc
            .apply(RecognitionEvent {
                code: 10165,
                message: "invalid handle".to_string(),
                text: None,
                status: None,
            })
            .unwrap_err();

        match err {
            SpeechError::Vendor { code, message } => {
                assert_eq!(code, 10165);
                assert_eq!(message, "invalid handle");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_transcript_ignores_events_after_completion() {
        let mut acc = TranscriptAccumulator::new();
        acc.apply(text_event("结束", 2)).unwrap();
        assert_eq!(acc.apply(text_event("多余", 1)).unwrap(), Step::Complete);
        assert!(acc.is_complete());
        assert_eq!(acc.into_transcript(), "结束");
    }

    #[test]
    fn test_audio_concatenates_in_receipt_order() {
        let mut acc = AudioAccumulator::new();
        acc.apply(audio_event(&[1, 2], 1)).unwrap();
        acc.apply(audio_event(&[3], 1)).unwrap();
        acc.apply(audio_event(&[4, 5, 6], 1)).unwrap();
        let step = acc
            .apply(SynthesisEvent {
                status: Some(2),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(step, Step::Complete);
        assert_eq!(acc.chunks(), 3);
        assert_eq!(acc.into_audio(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_audio_keeps_chunk_carried_by_final_frame() {
        let mut acc = AudioAccumulator::new();
        acc.apply(audio_event(&[9], 1)).unwrap();
        acc.apply(audio_event(&[8], 2)).unwrap();
        assert_eq!(acc.into_audio(), vec![9, 8]);
    }

    #[test]
    fn test_audio_vendor_error() {
        let mut acc = AudioAccumulator::new();
        acc.apply(audio_event(&[1, 2, 3], 1)).unwrap();
        let err = acc
            .apply(SynthesisEvent {
                code: 11200,
                message: "licc limit".to_string(),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, SpeechError::Vendor { code: 11200, .. }));
    }
}
