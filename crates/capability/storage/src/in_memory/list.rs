//! 清单内存仓储实现
//!
//! 清单按创建序保存在单一 Vec 中；复制清单的语义由台账层
//! 组合 create_list 完成，仓储不感知。

use crate::error::StorageError;
use crate::kv::BlobStore;
use crate::models::{ReadingListRecord, ReadingListUpdate};
use crate::snapshot::{keys, SnapshotSink};
use crate::traits::ListStore;
use crate::validation::{ensure_catalog_admin, ensure_identified};
use domain::SessionContext;
use std::sync::{Arc, RwLock};

/// 清单内存仓储
pub struct InMemoryListStore {
    lists: RwLock<Vec<ReadingListRecord>>,
    snapshot: Option<SnapshotSink>,
}

impl InMemoryListStore {
    /// 创建易失仓储
    pub fn new() -> Self {
        Self {
            lists: RwLock::new(Vec::new()),
            snapshot: None,
        }
    }

    /// 创建快照写穿仓储，并从快照加载初始集合
    pub fn with_snapshot(blobs: Arc<dyn BlobStore>) -> Self {
        let snapshot = SnapshotSink::new(blobs, keys::LISTS);
        let lists = snapshot.load::<ReadingListRecord>();
        Self {
            lists: RwLock::new(lists),
            snapshot: Some(snapshot),
        }
    }

    fn persist(&self, items: &[ReadingListRecord]) {
        if let Some(snapshot) = &self.snapshot {
            snapshot.save(items);
        }
    }
}

impl Default for InMemoryListStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ListStore for InMemoryListStore {
    /// 按创建序列出所有清单
    async fn list_lists(
        &self,
        ctx: &SessionContext,
    ) -> Result<Vec<ReadingListRecord>, StorageError> {
        ensure_identified(ctx)?;
        let items = self
            .lists
            .read()
            .map(|items| items.clone())
            .unwrap_or_default();
        Ok(items)
    }

    /// 查找指定清单
    async fn find_list(
        &self,
        ctx: &SessionContext,
        list_id: &str,
    ) -> Result<Option<ReadingListRecord>, StorageError> {
        ensure_identified(ctx)?;
        let item = self
            .lists
            .read()
            .ok()
            .and_then(|items| items.iter().find(|item| item.list_id == list_id).cloned());
        Ok(item)
    }

    /// 创建新清单
    async fn create_list(
        &self,
        ctx: &SessionContext,
        record: ReadingListRecord,
    ) -> Result<ReadingListRecord, StorageError> {
        ensure_catalog_admin(ctx)?;
        let mut items = self
            .lists
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if items.iter().any(|item| item.list_id == record.list_id) {
            return Err(StorageError::new("list exists"));
        }
        items.push(record.clone());
        self.persist(&items);
        Ok(record)
    }

    /// 部分更新清单
    async fn update_list(
        &self,
        ctx: &SessionContext,
        list_id: &str,
        update: ReadingListUpdate,
    ) -> Result<Option<ReadingListRecord>, StorageError> {
        ensure_catalog_admin(ctx)?;
        let mut items = self
            .lists
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let list = match items.iter_mut().find(|item| item.list_id == list_id) {
            Some(list) => list,
            None => return Ok(None),
        };
        if let Some(name) = update.name {
            list.name = name;
        }
        if let Some(point_ids) = update.point_ids {
            list.point_ids = point_ids;
        }
        if let Some(expected) = update.expected_completion_date {
            list.expected_completion_date = expected;
        }
        if let Some(is_model) = update.is_model {
            list.is_model = is_model;
        }
        list.updated_at = chrono::Utc::now();
        let updated = list.clone();
        self.persist(&items);
        Ok(Some(updated))
    }

    /// 删除清单
    async fn delete_list(
        &self,
        ctx: &SessionContext,
        list_id: &str,
    ) -> Result<bool, StorageError> {
        ensure_catalog_admin(ctx)?;
        let mut items = self
            .lists
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let before = items.len();
        items.retain(|item| item.list_id != list_id);
        let removed = items.len() != before;
        if removed {
            self.persist(&items);
        }
        Ok(removed)
    }
}
