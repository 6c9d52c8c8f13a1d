//! 应用层 - 命令
//!
//! 每个命令对应一次桥接调用

mod speech_commands;

pub mod handlers;

pub use speech_commands::*;
