//! speech-bridge - 讯飞语音听写 / 合成桥接服务
//!
//! - Domain: speech/ (会话状态机、帧归约、值对象)
//! - Application: commands, ports
//! - Infrastructure: http, adapters (xfyun, transcoder, storage, tts)

use std::sync::Arc;

use speech_bridge::application::AudioTranscoderPort;
use speech_bridge::config::{load_config, print_config, AppConfig, TranscodeBackend};
use speech_bridge::domain::speech::RecognitionOptions;
use speech_bridge::infrastructure::adapters::{
    install_crypto_provider, FfmpegTranscoder, FixtureSpeechSynthesizer, SymphoniaTranscoder,
    TempFileStore, XfyunCredentials, XfyunEndpoint, XfyunIatClient, XfyunIatClientConfig,
    XfyunTtsClient, XfyunTtsClientConfig,
};
use speech_bridge::infrastructure::http::{AppPorts, AppState, HttpServer, ServerConfig};

fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},speech_bridge={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn build_transcoder(config: &AppConfig) -> Arc<dyn AudioTranscoderPort> {
    match config.transcode.backend {
        TranscodeBackend::Symphonia => Arc::new(SymphoniaTranscoder::new()),
        TranscodeBackend::Ffmpeg => Arc::new(FfmpegTranscoder::new(&config.transcode.ffmpeg_path)),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：XFYUN_* > 环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("speech-bridge {}", env!("CARGO_PKG_VERSION"));
    print_config(&config);

    // wss 握手使用 rustls
    install_crypto_provider();

    let credentials = XfyunCredentials {
        app_id: config.xfyun.app_id.clone(),
        api_key: config.xfyun.api_key.clone(),
        api_secret: config.xfyun.api_secret.clone(),
    };

    // 讯飞听写
    let recognizer = Arc::new(XfyunIatClient::new(XfyunIatClientConfig {
        credentials: credentials.clone(),
        endpoint: XfyunEndpoint::new(&config.asr.host, &config.asr.path)
            .with_secure(config.xfyun.secure),
        frame_size: config.asr.frame_size,
        frame_interval_ms: config.asr.frame_interval_ms,
        timeout_secs: config.xfyun.timeout_secs,
    }));

    // 讯飞合成
    let synthesizer = Arc::new(XfyunTtsClient::new(XfyunTtsClientConfig {
        credentials,
        endpoint: XfyunEndpoint::new(&config.tts.host, &config.tts.path)
            .with_secure(config.xfyun.secure),
        timeout_secs: config.xfyun.timeout_secs,
    }));

    let storage = TempFileStore::new(&config.storage.temp_dir)
        .map_err(|e| anyhow::anyhow!("Failed to prepare temp dir: {}", e))?;

    let transcoder = build_transcoder(&config);
    tracing::info!(transcoder = transcoder.name(), "Audio transcoder ready");

    let ports = AppPorts {
        storage: Arc::new(storage),
        transcoder,
        recognizer,
        synthesizer,
        fixture: Arc::new(FixtureSpeechSynthesizer::new(&config.tts.fixture_path)),
    };

    let options = RecognitionOptions {
        language: config.asr.language.clone(),
        domain: config.asr.domain.clone(),
        accent: config.asr.accent.clone(),
    };
    let state = AppState::new(ports, options, &config.tts.default_voice);

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        max_upload_size: config.server.max_upload_size,
    };
    let server = HttpServer::new(server_config, state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
