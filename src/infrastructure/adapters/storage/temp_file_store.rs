//! Temp File Store - 请求级临时文件实现
//!
//! 实现 ScratchStoragePort trait

use std::path::{Path, PathBuf};

use crate::application::ports::{ScratchFile, ScratchStoragePort, StorageError};

/// 基于 `tempfile` 的临时文件存储
#[derive(Debug, Clone)]
pub struct TempFileStore {
    /// 临时文件根目录
    base_dir: PathBuf,
}

impl TempFileStore {
    /// 创建存储并确保目录存在
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let base_dir = base_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

impl ScratchStoragePort for TempFileStore {
    fn create(&self, prefix: &str, suffix: &str) -> Result<ScratchFile, StorageError> {
        let temp_path = tempfile::Builder::new()
            .prefix(prefix)
            .suffix(suffix)
            .tempfile_in(&self.base_dir)?
            .into_temp_path();

        tracing::trace!(path = %temp_path.display(), "Scratch file created");

        Ok(ScratchFile::new(temp_path))
    }
}
