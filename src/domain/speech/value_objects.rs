//! Speech Context - Value Objects

/// 识别接口要求的 PCM 采样率
pub const PCM_SAMPLE_RATE: u32 = 16_000;
/// 识别接口要求的声道数
pub const PCM_CHANNELS: u16 = 1;
/// 识别接口要求的位深
pub const PCM_BITS_PER_SAMPLE: u16 = 16;

/// 韵律参数取值 (0 - 100)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProsodyLevel(u8);

impl ProsodyLevel {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 100;
    pub const DEFAULT: u8 = 50;

    /// 超出范围的值被截断到 [0, 100]
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::default();
        }
        let clamped = value.round().clamp(Self::MIN as f64, Self::MAX as f64);
        Self(clamped as u8)
    }

    /// 缺省或非数值时取默认值 50
    pub fn from_optional(value: Option<f64>) -> Self {
        value.map(Self::new).unwrap_or_default()
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for ProsodyLevel {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// 合成韵律：语速、音量、音调
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Prosody {
    pub speed: ProsodyLevel,
    pub volume: ProsodyLevel,
    pub pitch: ProsodyLevel,
}

impl Prosody {
    pub fn new(speed: Option<f64>, volume: Option<f64>, pitch: Option<f64>) -> Self {
        Self {
            speed: ProsodyLevel::from_optional(speed),
            volume: ProsodyLevel::from_optional(volume),
            pitch: ProsodyLevel::from_optional(pitch),
        }
    }
}

/// 发音人标识 (vcn)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceName(String);

impl VoiceName {
    pub fn new(name: impl Into<String>) -> Result<Self, &'static str> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err("发音人不能为空");
        }
        if trimmed.len() > 64 {
            return Err("发音人长度不能超过64字符");
        }
        Ok(Self(trimmed.to_string()))
    }

    /// 未指定或无效时使用默认发音人
    pub fn or_default(name: Option<&str>, default: &str) -> Self {
        name.and_then(|n| Self::new(n).ok())
            .unwrap_or_else(|| Self(default.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VoiceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 听写业务参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionOptions {
    pub language: String,
    pub domain: String,
    pub accent: String,
}

impl Default for RecognitionOptions {
    fn default() -> Self {
        Self {
            language: "zh_cn".to_string(),
            domain: "iat".to_string(),
            accent: "mandarin".to_string(),
        }
    }
}
