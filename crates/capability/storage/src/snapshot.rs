//! 整集合 JSON 快照
//!
//! 每个集合在键值存储中占一个固定键，内容是整集合的 JSON 数组。
//! 读取容忍键缺失（首次运行）与内容损坏（记日志并降级为空集合）；
//! 写入失败只记录日志与计数，绝不向调用方传播。

use crate::kv::BlobStore;
use rounds_telemetry::{record_snapshot_load_failure, record_snapshot_save_failure};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

/// 各集合的固定存储键。
pub mod keys {
    pub const POINTS: &str = "rounds.points";
    pub const LISTS: &str = "rounds.lists";
    pub const READINGS: &str = "rounds.readings";
    pub const SUBMISSIONS: &str = "rounds.submissions";
    pub const USERS: &str = "rounds.users";
}

/// 单个集合的快照出入口。
///
/// 仓储在每次变更后调用 [`SnapshotSink::save`]，把持久化做成
/// 显式、可测试的副作用。
pub struct SnapshotSink {
    blobs: Arc<dyn BlobStore>,
    key: &'static str,
}

impl SnapshotSink {
    /// 绑定键值存储与固定键
    pub fn new(blobs: Arc<dyn BlobStore>, key: &'static str) -> Self {
        Self { blobs, key }
    }

    /// 加载集合快照；缺失或损坏时返回空集合
    pub fn load<T: DeserializeOwned>(&self) -> Vec<T> {
        let bytes = match self.blobs.get(self.key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(target: "rounds.storage", key = self.key, error = %err, "snapshot read failed, starting empty");
                record_snapshot_load_failure();
                return Vec::new();
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(items) => items,
            Err(err) => {
                warn!(target: "rounds.storage", key = self.key, error = %err, "malformed snapshot, starting empty");
                record_snapshot_load_failure();
                Vec::new()
            }
        }
    }

    /// 保存集合快照；失败只记录日志与计数
    pub fn save<T: Serialize>(&self, items: &[T]) {
        let bytes = match serde_json::to_vec(items) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(target: "rounds.storage", key = self.key, error = %err, "snapshot encode failed");
                record_snapshot_save_failure();
                return;
            }
        };
        if let Err(err) = self.blobs.put(self.key, &bytes) {
            warn!(target: "rounds.storage", key = self.key, error = %err, "snapshot write failed");
            record_snapshot_save_failure();
        }
    }

    /// 快照绑定的存储键（测试用）
    pub fn key(&self) -> &'static str {
        self.key
    }
}
