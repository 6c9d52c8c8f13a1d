//! 讯飞语音听写 (iat) 客户端
//!
//! 实现 SpeechRecognizerPort：
//! 读取 PCM -> 切帧 -> 流式发送，同时接收并累加识别结果，
//! 收到 `code == 0 && data.status == 2` 后关闭连接。

use async_trait::async_trait;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio_tungstenite::tungstenite::{self, Message};

use super::connection::{
    connect, timeout_from_secs, transport_error, within_timeout, VendorSocket, XfyunCredentials,
    XfyunEndpoint,
};
use super::frames::{iat_frames, IatResponseFrame};
use super::signer::XfyunSigner;
use crate::application::ports::{RecognizeRequest, RecognizeResponse, SpeechRecognizerPort};
use crate::domain::speech::{
    BridgeSession, SessionPhase, SpeechError, Step, TranscriptAccumulator,
};

type FrameSink = SplitSink<VendorSocket, Message>;

/// 听写客户端配置
#[derive(Debug, Clone)]
pub struct XfyunIatClientConfig {
    pub credentials: XfyunCredentials,
    pub endpoint: XfyunEndpoint,
    /// 每帧 PCM 字节数
    pub frame_size: usize,
    /// 帧间隔（毫秒），0 表示不等待
    pub frame_interval_ms: u64,
    /// 整个交互的超时（秒），0 表示不限时
    pub timeout_secs: u64,
}

impl Default for XfyunIatClientConfig {
    fn default() -> Self {
        Self {
            credentials: XfyunCredentials::default(),
            endpoint: XfyunEndpoint::new("iat-api.xfyun.cn", "/v2/iat"),
            frame_size: 1280,
            frame_interval_ms: 0,
            timeout_secs: 0,
        }
    }
}

/// 讯飞听写客户端
pub struct XfyunIatClient {
    config: XfyunIatClientConfig,
    signer: XfyunSigner,
}

impl XfyunIatClient {
    pub fn new(config: XfyunIatClientConfig) -> Self {
        let signer = config.credentials.signer();
        Self { config, signer }
    }

    async fn exchange(
        &self,
        session: &mut BridgeSession,
        frames: Vec<String>,
    ) -> Result<TranscriptAccumulator, SpeechError> {
        session.advance(SessionPhase::Connecting)?;
        let socket = connect(&self.config.endpoint, &self.signer).await?;
        session.advance(SessionPhase::Streaming)?;

        let (sink, mut stream) = socket.split();
        let interval = Duration::from_millis(self.config.frame_interval_ms);
        let sender = send_frames(sink, frames, interval);
        tokio::pin!(sender);

        let mut sink: Option<FrameSink> = None;
        let mut transcript = TranscriptAccumulator::new();

        // 边发边收：发送途中服务端返回的错误码优先于随之而来的发送失败
        let outcome = loop {
            tokio::select! {
                biased;

                inbound = stream.next() => {
                    match on_message(inbound, &mut transcript) {
                        Ok(Step::Complete) => break Ok(()),
                        Ok(Step::Continue) => {}
                        Err(e) => break Err(e),
                    }
                }
                sent = &mut sender, if sink.is_none() => {
                    match sent {
                        Ok(done) => {
                            sink = Some(done);
                            if let Err(e) = session.advance(SessionPhase::AwaitingCompletion) {
                                break Err(e);
                            }
                        }
                        Err(e) => break Err(e),
                    }
                }
            }
        };

        if let Some(mut sink) = sink {
            if let Err(e) = sink.close().await {
                tracing::debug!(error = %e, "Failed to close iat socket");
            }
        }

        outcome.map(|_| transcript)
    }
}

async fn send_frames(
    mut sink: FrameSink,
    frames: Vec<String>,
    interval: Duration,
) -> Result<FrameSink, SpeechError> {
    for (index, frame) in frames.into_iter().enumerate() {
        if index > 0 && !interval.is_zero() {
            tokio::time::sleep(interval).await;
        }
        sink.send(Message::Text(frame))
            .await
            .map_err(transport_error)?;
    }
    Ok(sink)
}

fn on_message(
    inbound: Option<Result<Message, tungstenite::Error>>,
    transcript: &mut TranscriptAccumulator,
) -> Result<Step, SpeechError> {
    let message = match inbound {
        Some(message) => message.map_err(transport_error)?,
        None => return Err(SpeechError::ConnectionClosed),
    };

    match message {
        Message::Text(raw) => {
            let frame = IatResponseFrame::parse(&raw)?;
            if frame.code != 0 {
                tracing::warn!(
                    code = frame.code,
                    message = %frame.message,
                    sid = ?frame.sid,
                    "iat returned an error"
                );
            }
            transcript.apply(frame.into_event())
        }
        Message::Close(close) => {
            tracing::debug!(frame = ?close, "iat closed the connection");
            Err(SpeechError::ConnectionClosed)
        }
        _ => Ok(Step::Continue),
    }
}

#[async_trait]
impl SpeechRecognizerPort for XfyunIatClient {
    async fn recognize(&self, request: RecognizeRequest) -> Result<RecognizeResponse, SpeechError> {
        let pcm = tokio::fs::read(&request.pcm_path).await.map_err(|e| {
            SpeechError::Io(format!("{}: {}", request.pcm_path.display(), e))
        })?;

        let frames = iat_frames(
            &self.config.credentials.app_id,
            &request.options,
            &pcm,
            self.config.frame_size,
        )
        .iter()
        .map(serde_json::to_string)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| SpeechError::MalformedFrame(e.to_string()))?;
        let frames_sent = frames.len();

        tracing::debug!(
            pcm_size = pcm.len(),
            frames = frames_sent,
            "Starting iat exchange"
        );

        let mut session = BridgeSession::new("iat");
        let outcome = within_timeout(
            timeout_from_secs(self.config.timeout_secs),
            self.exchange(&mut session, frames),
        )
        .await;

        let transcript = session.settle(outcome).inspect_err(|e| {
            tracing::warn!(error = %e, "iat exchange failed");
        })?;

        Ok(RecognizeResponse {
            fragments: transcript.fragments(),
            transcript: transcript.into_transcript(),
            frames_sent,
        })
    }
}
