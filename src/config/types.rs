//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 讯飞应用凭证
    #[serde(default)]
    pub xfyun: XfyunConfig,

    /// 语音听写
    #[serde(default)]
    pub asr: AsrConfig,

    /// 语音合成
    #[serde(default)]
    pub tts: TtsConfig,

    /// 音频转码
    #[serde(default)]
    pub transcode: TranscodeConfig,

    /// 临时文件
    #[serde(default)]
    pub storage: StorageConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 请求体上限（字节）
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_upload_size() -> usize {
    25 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_size: default_max_upload_size(),
        }
    }
}

/// 讯飞控制台凭证
///
/// 凭证为空时服务仍可启动（调试模式不需要），握手会被讯飞拒绝。
#[derive(Clone, Deserialize)]
pub struct XfyunConfig {
    #[serde(default)]
    pub app_id: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default)]
    pub api_secret: String,

    /// 使用 wss（测试替身可关闭）
    #[serde(default = "default_secure")]
    pub secure: bool,

    /// 单次交互超时（秒），0 表示不限时
    #[serde(default)]
    pub timeout_secs: u64,
}

fn default_secure() -> bool {
    true
}

impl Default for XfyunConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            secure: default_secure(),
            timeout_secs: 0,
        }
    }
}

impl std::fmt::Debug for XfyunConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XfyunConfig")
            .field("app_id", &self.app_id)
            .field("api_key", &self.api_key)
            .field("api_secret", &"***")
            .field("secure", &self.secure)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// 语音听写配置
#[derive(Debug, Clone, Deserialize)]
pub struct AsrConfig {
    #[serde(default = "default_asr_host")]
    pub host: String,

    #[serde(default = "default_asr_path")]
    pub path: String,

    /// 每帧 PCM 字节数
    #[serde(default = "default_frame_size")]
    pub frame_size: usize,

    /// 帧间隔（毫秒）
    #[serde(default)]
    pub frame_interval_ms: u64,

    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default = "default_domain")]
    pub domain: String,

    #[serde(default = "default_accent")]
    pub accent: String,
}

fn default_asr_host() -> String {
    "iat-api.xfyun.cn".to_string()
}

fn default_asr_path() -> String {
    "/v2/iat".to_string()
}

fn default_frame_size() -> usize {
    1280
}

fn default_language() -> String {
    "zh_cn".to_string()
}

fn default_domain() -> String {
    "iat".to_string()
}

fn default_accent() -> String {
    "mandarin".to_string()
}

impl Default for AsrConfig {
    fn default() -> Self {
        Self {
            host: default_asr_host(),
            path: default_asr_path(),
            frame_size: default_frame_size(),
            frame_interval_ms: 0,
            language: default_language(),
            domain: default_domain(),
            accent: default_accent(),
        }
    }
}

/// 语音合成配置
#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    #[serde(default = "default_tts_host")]
    pub host: String,

    #[serde(default = "default_tts_path")]
    pub path: String,

    /// 请求未指定发音人时使用
    #[serde(default = "default_voice")]
    pub default_voice: String,

    /// 调试模式返回的 MP3
    #[serde(default = "default_fixture_path")]
    pub fixture_path: PathBuf,
}

fn default_tts_host() -> String {
    "cbm01.cn-huabei-1.xf-yun.com".to_string()
}

fn default_tts_path() -> String {
    "/v1/private/mcd9m97e6".to_string()
}

fn default_voice() -> String {
    "x5_lingfeiyi_flow".to_string()
}

fn default_fixture_path() -> PathBuf {
    PathBuf::from("es.mp3")
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            host: default_tts_host(),
            path: default_tts_path(),
            default_voice: default_voice(),
            fixture_path: default_fixture_path(),
        }
    }
}

/// 转码后端
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscodeBackend {
    /// 进程内解码
    #[default]
    Symphonia,
    /// 外部 ffmpeg 进程
    Ffmpeg,
}

/// 音频转码配置
#[derive(Debug, Clone, Deserialize)]
pub struct TranscodeConfig {
    #[serde(default)]
    pub backend: TranscodeBackend,

    /// ffmpeg 可执行文件
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

impl Default for TranscodeConfig {
    fn default() -> Self {
        Self {
            backend: TranscodeBackend::default(),
            ffmpeg_path: default_ffmpeg_path(),
        }
    }
}

/// 临时文件配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 上传音频与 PCM 的临时目录
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,
}

fn default_temp_dir() -> PathBuf {
    std::env::temp_dir().join("speech-bridge")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            temp_dir: default_temp_dir(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别 (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON 格式输出
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
