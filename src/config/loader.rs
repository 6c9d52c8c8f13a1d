//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. `XFYUN_APPID` / `XFYUN_API_KEY` / `XFYUN_API_SECRET`
//! 2. 环境变量（前缀 `SPEECH_BRIDGE_`）
//! 3. 配置文件（config.toml）
//! 4. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 讯飞控制台惯用的环境变量名 -> 配置键
const XFYUN_ENV_OVERRIDES: &[(&str, &str)] = &[
    ("XFYUN_APPID", "xfyun.app_id"),
    ("XFYUN_API_KEY", "xfyun.api_key"),
    ("XFYUN_API_SECRET", "xfyun.api_secret"),
];

/// 加载应用配置
///
/// # 环境变量示例
/// - `SPEECH_BRIDGE_SERVER__PORT=8080`
/// - `SPEECH_BRIDGE_ASR__FRAME_SIZE=640`
/// - `SPEECH_BRIDGE_TRANSCODE__BACKEND=ffmpeg`
/// - `XFYUN_APPID=...`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// `config_path` 为 None 时搜索默认配置文件
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 3000)?
        .set_default("server.max_upload_size", 25 * 1024 * 1024)?
        .set_default("xfyun.secure", true)?
        .set_default("xfyun.timeout_secs", 0)?
        .set_default("asr.host", "iat-api.xfyun.cn")?
        .set_default("asr.path", "/v2/iat")?
        .set_default("asr.frame_size", 1280)?
        .set_default("asr.frame_interval_ms", 0)?
        .set_default("tts.host", "cbm01.cn-huabei-1.xf-yun.com")?
        .set_default("tts.path", "/v1/private/mcd9m97e6")?
        .set_default("tts.default_voice", "x5_lingfeiyi_flow")?
        .set_default("tts.fixture_path", "es.mp3")?
        .set_default("transcode.backend", "symphonia")?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量，例如 SPEECH_BRIDGE_XFYUN__TIMEOUT_SECS=30
    builder = builder.add_source(
        Environment::with_prefix("SPEECH_BRIDGE")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. 讯飞惯用变量名
    for (key, value) in xfyun_env_overrides(|name| std::env::var(name).ok()) {
        builder = builder.set_override(key, value)?;
    }

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 收集已设置且非空的讯飞环境变量
fn xfyun_env_overrides<F>(lookup: F) -> Vec<(&'static str, String)>
where
    F: Fn(&str) -> Option<String>,
{
    XFYUN_ENV_OVERRIDES
        .iter()
        .filter_map(|(name, key)| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .map(|value| (*key, value))
        })
        .collect()
}

fn require_non_empty(value: &str, name: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::ValidationError(format!(
            "{} cannot be empty",
            name
        )));
    }
    Ok(())
}

fn require_path(value: &str, name: &str) -> Result<(), ConfigError> {
    require_non_empty(value, name)?;
    if !value.starts_with('/') {
        return Err(ConfigError::ValidationError(format!(
            "{} must start with '/': {}",
            name, value
        )));
    }
    Ok(())
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.asr.frame_size == 0 {
        return Err(ConfigError::ValidationError(
            "ASR frame size cannot be 0".to_string(),
        ));
    }

    require_non_empty(&config.asr.host, "ASR host")?;
    require_path(&config.asr.path, "ASR path")?;
    require_non_empty(&config.tts.host, "TTS host")?;
    require_path(&config.tts.path, "TTS path")?;
    require_non_empty(&config.tts.default_voice, "TTS default voice")?;

    // 凭证缺失不阻止启动，调试合成仍然可用
    let xfyun = &config.xfyun;
    if xfyun.app_id.is_empty() || xfyun.api_key.is_empty() || xfyun.api_secret.is_empty() {
        tracing::warn!("xfyun credentials are incomplete, vendor handshakes will be rejected");
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Max Upload Size: {} bytes", config.server.max_upload_size);
    tracing::info!("xfyun App ID: {}", config.xfyun.app_id);
    tracing::info!("xfyun Secure: {}", config.xfyun.secure);
    if config.xfyun.timeout_secs > 0 {
        tracing::info!("xfyun Timeout: {}s", config.xfyun.timeout_secs);
    }
    tracing::info!("ASR Endpoint: {}{}", config.asr.host, config.asr.path);
    tracing::info!("ASR Frame Size: {} bytes", config.asr.frame_size);
    tracing::info!("TTS Endpoint: {}{}", config.tts.host, config.tts.path);
    tracing::info!("TTS Default Voice: {}", config.tts.default_voice);
    tracing::info!("TTS Fixture: {:?}", config.tts.fixture_path);
    tracing::info!("Transcode Backend: {:?}", config.transcode.backend);
    tracing::info!("Temp Directory: {:?}", config.storage.temp_dir);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TranscodeBackend;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_frame_size() {
        let mut config = AppConfig::default();
        config.asr.frame_size = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_host() {
        let mut config = AppConfig::default();
        config.tts.host = " ".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_relative_path() {
        let mut config = AppConfig::default();
        config.asr.path = "v2/iat".to_string();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_missing_credentials_only_warn() {
        let config = AppConfig::default();
        assert!(config.xfyun.app_id.is_empty());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_xfyun_env_overrides() {
        let env: HashMap<&str, &str> = [("XFYUN_APPID", "app-1"), ("XFYUN_API_SECRET", "")]
            .into_iter()
            .collect();

        let overrides = xfyun_env_overrides(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(overrides, vec![("xfyun.app_id", "app-1".to_string())]);
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bridge.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 8080

[asr]
frame_size = 640

[transcode]
backend = "ffmpeg"
"#,
        )
        .unwrap();

        let config = load_config_from_path(Some(&path)).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.asr.frame_size, 640);
        assert_eq!(config.asr.host, "iat-api.xfyun.cn");
        assert_eq!(config.transcode.backend, TranscodeBackend::Ffmpeg);
        assert_eq!(config.tts.default_voice, "x5_lingfeiyi_flow");
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bridge.toml");
        std::fs::write(&path, "[asr]\npath = \"no-slash\"\n").unwrap();

        assert!(matches!(
            load_config_from_path(Some(&path)),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
