//! 讯飞流式语音合成客户端
//!
//! 一次请求只发送一帧（整段文本），之后持续接收 base64 音频片段，
//! 直到 `header.status == 2`。

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::{self, Message};

use super::connection::{
    connect, timeout_from_secs, transport_error, within_timeout, XfyunCredentials, XfyunEndpoint,
};
use super::frames::{TtsRequestFrame, TtsResponseFrame};
use super::signer::XfyunSigner;
use crate::application::ports::{SpeechSynthesizerPort, SynthesizeRequest, SynthesizeResponse};
use crate::domain::speech::{AudioAccumulator, BridgeSession, SessionPhase, SpeechError, Step};

/// 合成客户端配置
#[derive(Debug, Clone)]
pub struct XfyunTtsClientConfig {
    pub credentials: XfyunCredentials,
    pub endpoint: XfyunEndpoint,
    /// 整个交互的超时（秒），0 表示不限时
    pub timeout_secs: u64,
}

impl Default for XfyunTtsClientConfig {
    fn default() -> Self {
        Self {
            credentials: XfyunCredentials::default(),
            endpoint: XfyunEndpoint::new("cbm01.cn-huabei-1.xf-yun.com", "/v1/private/mcd9m97e6"),
            timeout_secs: 0,
        }
    }
}

/// 讯飞合成客户端
pub struct XfyunTtsClient {
    config: XfyunTtsClientConfig,
    signer: XfyunSigner,
}

impl XfyunTtsClient {
    pub fn new(config: XfyunTtsClientConfig) -> Self {
        let signer = config.credentials.signer();
        Self { config, signer }
    }

    async fn exchange(
        &self,
        session: &mut BridgeSession,
        frame: String,
    ) -> Result<AudioAccumulator, SpeechError> {
        session.advance(SessionPhase::Connecting)?;
        let mut socket = connect(&self.config.endpoint, &self.signer).await?;
        session.advance(SessionPhase::Streaming)?;

        socket
            .send(Message::Text(frame))
            .await
            .map_err(transport_error)?;
        session.advance(SessionPhase::AwaitingCompletion)?;

        let mut audio = AudioAccumulator::new();
        let outcome = loop {
            match on_message(socket.next().await, &mut audio) {
                Ok(Step::Complete) => break Ok(()),
                Ok(Step::Continue) => {}
                Err(e) => break Err(e),
            }
        };

        if let Err(e) = socket.close(None).await {
            tracing::debug!(error = %e, "Failed to close tts socket");
        }

        outcome.map(|_| audio)
    }
}

fn on_message(
    inbound: Option<Result<Message, tungstenite::Error>>,
    audio: &mut AudioAccumulator,
) -> Result<Step, SpeechError> {
    let message = match inbound {
        Some(message) => message.map_err(transport_error)?,
        None => return Err(SpeechError::ConnectionClosed),
    };

    match message {
        Message::Text(raw) => {
            let frame = TtsResponseFrame::parse(&raw)?;
            match &frame.header {
                Some(header) if header.code != 0 => tracing::warn!(
                    code = header.code,
                    message = %header.message,
                    sid = ?header.sid,
                    "tts returned an error"
                ),
                Some(_) => {}
                None => tracing::warn!("tts message without header"),
            }
            audio.apply(frame.into_event()?)
        }
        Message::Close(close) => {
            tracing::debug!(frame = ?close, "tts closed the connection");
            Err(SpeechError::ConnectionClosed)
        }
        _ => Ok(Step::Continue),
    }
}

#[async_trait]
impl SpeechSynthesizerPort for XfyunTtsClient {
    async fn synthesize(
        &self,
        request: SynthesizeRequest,
    ) -> Result<SynthesizeResponse, SpeechError> {
        let frame = TtsRequestFrame::new(
            &self.config.credentials.app_id,
            &request.text,
            &request.voice,
            &request.prosody,
        );
        let frame =
            serde_json::to_string(&frame).map_err(|e| SpeechError::MalformedFrame(e.to_string()))?;

        tracing::debug!(
            voice = %request.voice,
            text_len = request.text.chars().count(),
            "Starting tts exchange"
        );

        let mut session = BridgeSession::new("tts");
        let outcome = within_timeout(
            timeout_from_secs(self.config.timeout_secs),
            self.exchange(&mut session, frame),
        )
        .await;

        let audio = session.settle(outcome).inspect_err(|e| {
            tracing::warn!(error = %e, "tts exchange failed");
        })?;

        Ok(SynthesizeResponse {
            chunks: audio.chunks(),
            audio_data: audio.into_audio(),
        })
    }
}
