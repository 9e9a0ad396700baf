//! 键值字节存储协作方
//!
//! 持久化协作方是一个按固定键存取字节串的键值存储。
//! 提供两个实现：
//! - InMemoryBlobStore：进程内存储（测试与易失运行）
//! - FileBlobStore：目录文件存储（每个键一个 JSON 文件）

use crate::error::StorageError;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// 键值字节存储接口。
pub trait BlobStore: Send + Sync {
    /// 读取键内容；键不存在返回 None
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// 整体写入键内容
    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError>;

    /// 删除键；键不存在视为成功
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// 内存键值存储
pub struct InMemoryBlobStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryBlobStore {
    /// 创建空的内存键值存储
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BlobStore for InMemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        entries.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        entries.remove(key);
        Ok(())
    }
}

/// 文件键值存储
///
/// 每个键落在数据目录下的同名 `.json` 文件。键由本 crate 的
/// 固定常量给出，不接受外部输入，无需路径清洗。
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    /// 打开（必要时创建）数据目录
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        match std::fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        std::fs::write(self.path_for(key), bytes)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
