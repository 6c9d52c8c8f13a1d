//! Speech Commands

/// 听写命令：一次上传的音频
#[derive(Debug, Clone)]
pub struct TranscribeAudio {
    /// 上传的原始音频字节
    pub audio_data: Vec<u8>,
    /// 上传文件名（用于推断扩展名）
    pub file_name: Option<String>,
}

/// 合成命令
///
/// 数值参数缺省或非数值时为 `None`，由处理器填充默认值。
#[derive(Debug, Clone, Default)]
pub struct SynthesizeSpeech {
    pub text: Option<String>,
    pub voice: Option<String>,
    pub speed: Option<f64>,
    pub volume: Option<f64>,
    pub pitch: Option<f64>,
    /// 调试模式：直接返回本地音频，不访问讯飞
    pub debug: bool,
}
