//! 讯飞连接参数与握手
//!
//! 每次握手都重新签名，凭证不跨连接复用。

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use super::signer::XfyunSigner;
use crate::domain::speech::SpeechError;

pub type VendorSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// 讯飞控制台应用凭证
#[derive(Clone, Default)]
pub struct XfyunCredentials {
    pub app_id: String,
    pub api_key: String,
    pub api_secret: String,
}

impl std::fmt::Debug for XfyunCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XfyunCredentials")
            .field("app_id", &self.app_id)
            .field("api_key", &self.api_key)
            .field("api_secret", &"***")
            .finish()
    }
}

impl XfyunCredentials {
    pub fn signer(&self) -> XfyunSigner {
        XfyunSigner::new(&self.api_key, &self.api_secret)
    }
}

/// 服务地址
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XfyunEndpoint {
    /// 主机名（可带端口），同时参与签名
    pub host: String,
    /// 资源路径，例如 `/v2/iat`
    pub path: String,
    /// wss / ws
    pub secure: bool,
}

impl XfyunEndpoint {
    pub fn new(host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            path: path.into(),
            secure: true,
        }
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }
}

static CRYPTO_PROVIDER: Once = Once::new();

/// 安装进程级 rustls 加密后端（ring），可重复调用
///
/// wss 握手前必须存在默认 CryptoProvider，否则 rustls 会 panic。
pub fn install_crypto_provider() {
    CRYPTO_PROVIDER.call_once(|| {
        if rustls::crypto::ring::default_provider()
            .install_default()
            .is_err()
        {
            tracing::debug!("rustls crypto provider already installed");
        }
    });
}

/// 签名并建立 WebSocket 连接
pub async fn connect(
    endpoint: &XfyunEndpoint,
    signer: &XfyunSigner,
) -> Result<VendorSocket, SpeechError> {
    let credential = signer.sign_now(&endpoint.host, &endpoint.path)?;
    let url = credential.endpoint_url(endpoint.secure, &endpoint.path)?;
    if endpoint.secure {
        install_crypto_provider();
    }

    tracing::debug!(
        host = %endpoint.host,
        path = %endpoint.path,
        date = %credential.date,
        "Connecting to xfyun"
    );

    let (socket, response) = connect_async(url.as_str()).await.map_err(|e| {
        SpeechError::Transport(format!("Handshake with {} failed: {}", endpoint.host, e))
    })?;

    tracing::debug!(status = %response.status(), "xfyun handshake completed");

    Ok(socket)
}

/// 0 表示不限时
pub fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// 给整个交互加可选的超时
pub async fn within_timeout<T, F>(timeout: Option<Duration>, exchange: F) -> Result<T, SpeechError>
where
    F: Future<Output = Result<T, SpeechError>>,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, exchange)
            .await
            .map_err(|_| SpeechError::Timeout)?,
        None => exchange.await,
    }
}

pub fn transport_error(err: tungstenite::Error) -> SpeechError {
    match err {
        tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
            SpeechError::ConnectionClosed
        }
        other => SpeechError::Transport(other.to_string()),
    }
}
