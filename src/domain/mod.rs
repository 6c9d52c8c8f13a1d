//! Domain Layer - 领域层
//!
//! Speech Context: 一次桥接调用的会话与结果归约

pub mod speech;
