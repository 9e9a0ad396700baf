//! 用户目录内存仓储实现
//!
//! 身份协作方的数据源；不存放任何凭据字段。

use crate::error::StorageError;
use crate::kv::BlobStore;
use crate::models::UserRecord;
use crate::snapshot::{keys, SnapshotSink};
use crate::traits::UserStore;
use crate::validation::{ensure_catalog_admin, ensure_identified};
use domain::SessionContext;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// 用户目录内存仓储
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, UserRecord>>,
    snapshot: Option<SnapshotSink>,
}

impl InMemoryUserStore {
    /// 创建易失仓储
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            snapshot: None,
        }
    }

    /// 创建快照写穿仓储，并从快照加载初始集合
    pub fn with_snapshot(blobs: Arc<dyn BlobStore>) -> Self {
        let snapshot = SnapshotSink::new(blobs, keys::USERS);
        let users = snapshot
            .load::<UserRecord>()
            .into_iter()
            .map(|user| (user.user_id.clone(), user))
            .collect();
        Self {
            users: RwLock::new(users),
            snapshot: Some(snapshot),
        }
    }

    fn persist(&self, map: &HashMap<String, UserRecord>) {
        if let Some(snapshot) = &self.snapshot {
            let items: Vec<UserRecord> = map.values().cloned().collect();
            snapshot.save(&items);
        }
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl UserStore for InMemoryUserStore {
    /// 列出全部用户
    async fn list_users(&self, ctx: &SessionContext) -> Result<Vec<UserRecord>, StorageError> {
        ensure_identified(ctx)?;
        let items = self
            .users
            .read()
            .map(|map| map.values().cloned().collect())
            .unwrap_or_default();
        Ok(items)
    }

    /// 根据用户 ID 查找用户
    async fn find_user(
        &self,
        ctx: &SessionContext,
        user_id: &str,
    ) -> Result<Option<UserRecord>, StorageError> {
        ensure_identified(ctx)?;
        let item = self
            .users
            .read()
            .ok()
            .and_then(|map| map.get(user_id).cloned());
        Ok(item)
    }

    /// 根据用户名查找用户
    async fn find_by_username(
        &self,
        ctx: &SessionContext,
        username: &str,
    ) -> Result<Option<UserRecord>, StorageError> {
        ensure_identified(ctx)?;
        let item = self.users.read().ok().and_then(|map| {
            map.values()
                .find(|user| user.username == username)
                .cloned()
        });
        Ok(item)
    }

    /// 创建或整体替换用户记录
    async fn upsert_user(
        &self,
        ctx: &SessionContext,
        record: UserRecord,
    ) -> Result<UserRecord, StorageError> {
        ensure_catalog_admin(ctx)?;
        let mut map = self
            .users
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        map.insert(record.user_id.clone(), record.clone());
        self.persist(&map);
        Ok(record)
    }
}
