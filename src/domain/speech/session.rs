//! Speech Context - 桥接会话状态机
//!
//! 一次桥接调用对应一条 WebSocket 连接:
//!
//! ```text
//! Idle -> Connecting -> Streaming -> AwaitingCompletion -> Closed
//! ```
//!
//! 任何阶段都可以直接进入 Closed（出错或完成）。

use super::SpeechError;

/// 会话阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// 尚未建立连接
    Idle,
    /// 正在握手
    Connecting,
    /// 正在发送数据帧
    Streaming,
    /// 数据已发送完毕，等待结束帧
    AwaitingCompletion,
    /// 连接已关闭
    Closed,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Idle => "idle",
            SessionPhase::Connecting => "connecting",
            SessionPhase::Streaming => "streaming",
            SessionPhase::AwaitingCompletion => "awaiting_completion",
            SessionPhase::Closed => "closed",
        }
    }

    fn can_advance_to(&self, next: SessionPhase) -> bool {
        matches!(
            (self, next),
            (SessionPhase::Idle, SessionPhase::Connecting)
                | (SessionPhase::Connecting, SessionPhase::Streaming)
                | (SessionPhase::Streaming, SessionPhase::AwaitingCompletion)
                | (_, SessionPhase::Closed)
        )
    }
}

/// 桥接会话
///
/// 不变量:
/// - 阶段只能沿固定顺序前进
/// - Closed 之后不再接受除 close 以外的任何转换
/// - 结果（成功或失败）只能落定一次
#[derive(Debug)]
pub struct BridgeSession {
    service: &'static str,
    phase: SessionPhase,
    settled: bool,
}

impl BridgeSession {
    pub fn new(service: &'static str) -> Self {
        Self {
            service,
            phase: SessionPhase::Idle,
            settled: false,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_closed(&self) -> bool {
        self.phase == SessionPhase::Closed
    }

    /// 推进到下一阶段
    pub fn advance(&mut self, next: SessionPhase) -> Result<(), SpeechError> {
        if self.phase == SessionPhase::Closed || !self.phase.can_advance_to(next) {
            return Err(SpeechError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }

        tracing::trace!(
            service = self.service,
            from = self.phase.as_str(),
            to = next.as_str(),
            "Bridge session transition"
        );
        self.phase = next;
        Ok(())
    }

    /// 关闭会话，幂等
    pub fn close(&mut self) {
        if self.phase != SessionPhase::Closed {
            tracing::trace!(
                service = self.service,
                from = self.phase.as_str(),
                "Bridge session closed"
            );
            self.phase = SessionPhase::Closed;
        }
    }

    /// 落定结果并关闭会话
    ///
    /// 第二次落定会被拒绝，保证每次调用只产生一个结果。
    pub fn settle<T>(&mut self, outcome: Result<T, SpeechError>) -> Result<T, SpeechError> {
        if self.settled {
            return Err(SpeechError::InvalidTransition {
                from: self.phase,
                to: SessionPhase::Closed,
            });
        }
        self.settled = true;
        self.close();
        outcome
    }
}
