//! 读数内存仓储实现
//!
//! 读数是插入序序列：整批原子追加、按 ID 删除，没有更新路径。

use crate::error::StorageError;
use crate::kv::BlobStore;
use crate::models::BuildingReadingRecord;
use crate::snapshot::{keys, SnapshotSink};
use crate::traits::ReadingStore;
use crate::validation::{ensure_catalog_admin, ensure_identified};
use domain::SessionContext;
use rounds_telemetry::record_reading_removed;
use std::sync::{Arc, RwLock};

/// 读数内存仓储
pub struct InMemoryReadingStore {
    readings: RwLock<Vec<BuildingReadingRecord>>,
    snapshot: Option<SnapshotSink>,
}

impl InMemoryReadingStore {
    /// 创建易失仓储
    pub fn new() -> Self {
        Self {
            readings: RwLock::new(Vec::new()),
            snapshot: None,
        }
    }

    /// 创建快照写穿仓储，并从快照加载初始集合
    pub fn with_snapshot(blobs: Arc<dyn BlobStore>) -> Self {
        let snapshot = SnapshotSink::new(blobs, keys::READINGS);
        let readings = snapshot.load::<BuildingReadingRecord>();
        Self {
            readings: RwLock::new(readings),
            snapshot: Some(snapshot),
        }
    }

    /// 当前读数条数（测试用）
    pub fn len(&self) -> usize {
        self.readings.read().map(|items| items.len()).unwrap_or(0)
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn persist(&self, items: &[BuildingReadingRecord]) {
        if let Some(snapshot) = &self.snapshot {
            snapshot.save(items);
        }
    }
}

impl Default for InMemoryReadingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ReadingStore for InMemoryReadingStore {
    /// 按插入序列出全部读数
    async fn list_readings(
        &self,
        ctx: &SessionContext,
    ) -> Result<Vec<BuildingReadingRecord>, StorageError> {
        ensure_identified(ctx)?;
        let items = self
            .readings
            .read()
            .map(|items| items.clone())
            .unwrap_or_default();
        Ok(items)
    }

    /// 原子追加一批读数
    async fn append_readings(
        &self,
        ctx: &SessionContext,
        readings: &[BuildingReadingRecord],
    ) -> Result<usize, StorageError> {
        ensure_identified(ctx)?;
        let mut items = self
            .readings
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        items.extend(readings.iter().cloned());
        self.persist(&items);
        Ok(readings.len())
    }

    /// 按 ID 删除读数
    async fn remove_reading(
        &self,
        ctx: &SessionContext,
        reading_id: &str,
    ) -> Result<bool, StorageError> {
        ensure_catalog_admin(ctx)?;
        let mut items = self
            .readings
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let before = items.len();
        items.retain(|item| item.reading_id != reading_id);
        let removed = items.len() != before;
        if removed {
            record_reading_removed();
            self.persist(&items);
        }
        Ok(removed)
    }
}
