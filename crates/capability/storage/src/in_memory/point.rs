//! 测点内存仓储实现
//!
//! 功能：
//! - 测点 CRUD 操作
//! - 台账管理角色门禁
//! - 每次变更触发快照写穿

use crate::error::StorageError;
use crate::kv::BlobStore;
use crate::models::{ReadingPointRecord, ReadingPointUpdate};
use crate::snapshot::{keys, SnapshotSink};
use crate::traits::PointStore;
use crate::validation::{ensure_catalog_admin, ensure_identified};
use domain::SessionContext;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// 测点内存仓储
///
/// 使用 RwLock + HashMap 提供线程安全的内存存储。
pub struct InMemoryPointStore {
    points: RwLock<HashMap<String, ReadingPointRecord>>,
    snapshot: Option<SnapshotSink>,
}

impl InMemoryPointStore {
    /// 创建易失仓储
    pub fn new() -> Self {
        Self {
            points: RwLock::new(HashMap::new()),
            snapshot: None,
        }
    }

    /// 创建快照写穿仓储，并从快照加载初始集合
    pub fn with_snapshot(blobs: Arc<dyn BlobStore>) -> Self {
        let snapshot = SnapshotSink::new(blobs, keys::POINTS);
        let points = snapshot
            .load::<ReadingPointRecord>()
            .into_iter()
            .map(|point| (point.point_id.clone(), point))
            .collect();
        Self {
            points: RwLock::new(points),
            snapshot: Some(snapshot),
        }
    }

    fn persist(&self, map: &HashMap<String, ReadingPointRecord>) {
        if let Some(snapshot) = &self.snapshot {
            let items: Vec<ReadingPointRecord> = map.values().cloned().collect();
            snapshot.save(&items);
        }
    }
}

impl Default for InMemoryPointStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl PointStore for InMemoryPointStore {
    /// 列出所有测点
    async fn list_points(
        &self,
        ctx: &SessionContext,
    ) -> Result<Vec<ReadingPointRecord>, StorageError> {
        ensure_identified(ctx)?;
        let items = self
            .points
            .read()
            .map(|map| map.values().cloned().collect())
            .unwrap_or_default();
        Ok(items)
    }

    /// 查找指定测点
    async fn find_point(
        &self,
        ctx: &SessionContext,
        point_id: &str,
    ) -> Result<Option<ReadingPointRecord>, StorageError> {
        ensure_identified(ctx)?;
        let item = self
            .points
            .read()
            .ok()
            .and_then(|map| map.get(point_id).cloned());
        Ok(item)
    }

    /// 创建新测点
    async fn create_point(
        &self,
        ctx: &SessionContext,
        record: ReadingPointRecord,
    ) -> Result<ReadingPointRecord, StorageError> {
        ensure_catalog_admin(ctx)?;
        let mut map = self
            .points
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if map.contains_key(&record.point_id) {
            return Err(StorageError::new("point exists"));
        }
        map.insert(record.point_id.clone(), record.clone());
        self.persist(&map);
        Ok(record)
    }

    /// 部分更新测点
    async fn update_point(
        &self,
        ctx: &SessionContext,
        point_id: &str,
        update: ReadingPointUpdate,
    ) -> Result<Option<ReadingPointRecord>, StorageError> {
        ensure_catalog_admin(ctx)?;
        let mut map = self
            .points
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let point = match map.get_mut(point_id) {
            Some(point) => point,
            None => return Ok(None),
        };
        if let Some(name) = update.name {
            point.name = name;
        }
        if let Some(building) = update.building {
            point.building = building;
        }
        if let Some(floor) = update.floor {
            point.floor = floor;
        }
        if let Some(room) = update.room {
            point.room = room;
        }
        if let Some(reading_type) = update.reading_type {
            point.reading_type = reading_type;
        }
        if let Some(component) = update.component {
            point.component = Some(component);
        }
        if let Some(unit) = update.unit {
            point.unit = unit;
        }
        if let Some(description) = update.description {
            point.description = Some(description);
        }
        if let Some(validation_mode) = update.validation_mode {
            point.validation_mode = validation_mode;
        }
        if let Some(min_value) = update.min_value {
            point.min_value = Some(min_value);
        }
        if let Some(max_value) = update.max_value {
            point.max_value = Some(max_value);
        }
        if let Some(active) = update.active {
            point.active = active;
        }
        let updated = point.clone();
        self.persist(&map);
        Ok(Some(updated))
    }

    /// 删除测点
    async fn delete_point(
        &self,
        ctx: &SessionContext,
        point_id: &str,
    ) -> Result<bool, StorageError> {
        ensure_catalog_admin(ctx)?;
        let mut map = self
            .points
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let removed = map.remove(point_id).is_some();
        if removed {
            self.persist(&map);
        }
        Ok(removed)
    }
}
