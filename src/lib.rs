//! speech-bridge - 讯飞语音听写 / 合成桥接服务
//!
//! 架构设计: DDD + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Speech Context: 桥接会话状态机、流式帧归约、韵律与发音人
//!
//! 应用层 (application/):
//! - Ports: 转码、听写、合成、临时存储
//! - Commands: 听写 / 合成命令处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: /api/transcribe, /api/synthesis
//! - Adapters: 讯飞 WebSocket 客户端、音频转码、临时文件、调试音频

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
