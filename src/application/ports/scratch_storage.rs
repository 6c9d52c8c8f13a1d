//! Scratch Storage Port - 请求级临时文件
//!
//! 上传音频与转码 PCM 只在一次请求内存在，
//! `ScratchFile` 在 `cleanup()` 或 drop 时删除自身。

use std::path::{Path, PathBuf};
use tempfile::TempPath;
use thiserror::Error;

/// 临时存储错误
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::IoError(err.to_string())
    }
}

/// 请求级临时文件
///
/// 删除失败只记录日志，不影响已经准备好的响应。
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
    inner: Option<TempPath>,
}

impl ScratchFile {
    pub fn new(inner: TempPath) -> Self {
        Self {
            path: inner.to_path_buf(),
            inner: Some(inner),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 显式删除
    pub fn cleanup(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        let Some(inner) = self.inner.take() else {
            return;
        };

        match inner.close() {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Scratch file removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove scratch file"
            ),
        }
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        self.remove();
    }
}

/// Scratch Storage Port
pub trait ScratchStoragePort: Send + Sync {
    /// 创建一个唯一命名的空文件
    fn create(&self, prefix: &str, suffix: &str) -> Result<ScratchFile, StorageError>;
}
