//! 采集会话：提交前的录入批次与完成状态。
//!
//! 会话只存在于单个页签的生命周期内，关闭即弃，不参与
//! 审核流程的持久化；完成记录的数据在批次入库时被吸收进
//! 对应的读数记录。
//!
//! 不变量：
//! - 标记完成后，该测点的值与备注锁定，update_entry 被拒绝
//! - 撤销标记永远允许，且不改动已录入的值
//! - 完成时间戳在标记当刻采集，不可回填

use chrono::{DateTime, Utc};
use domain::SessionContext;
use rounds_storage::ReadingPointRecord;
use rounds_telemetry::{record_completion_marked, record_completion_reverted};
use std::collections::{HashMap, HashSet};

/// 采集会话错误。
#[derive(Debug, thiserror::Error)]
pub enum CollectionError {
    #[error("point locked by completion: {0}")]
    Locked(String),
    #[error("no entry for point: {0}")]
    MissingEntry(String),
    #[error("entry not completable: {0}")]
    NotCompletable(String),
}

/// 单个测点的录入草稿（原文值 + 备注）。
#[derive(Debug, Clone, Default)]
pub struct PointEntry {
    pub value: String,
    pub notes: String,
}

/// 完成记录。仅存在于会话内，从不持久化。
#[derive(Debug, Clone)]
pub struct PointCompletion {
    pub point_id: String,
    pub completed_at: DateTime<Utc>,
    pub completed_by: Option<String>,
    pub value: String,
    pub notes: Option<String>,
}

/// 采集会话：测点 ID → 草稿与完成记录。
///
/// 来源系统维护清单级与逐点级两套完成集合再做并集展示；
/// 两者没有任何业务规则差异，这里统一为单一完成映射。
pub struct CollectionSession {
    entries: HashMap<String, PointEntry>,
    completions: HashMap<String, PointCompletion>,
}

impl CollectionSession {
    /// 创建空会话
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            completions: HashMap::new(),
        }
    }

    /// 写入或覆盖测点草稿；已完成的测点被锁定，拒绝修改
    pub fn update_entry(
        &mut self,
        point_id: &str,
        value: impl Into<String>,
        notes: impl Into<String>,
    ) -> Result<(), CollectionError> {
        if self.completions.contains_key(point_id) {
            return Err(CollectionError::Locked(point_id.to_string()));
        }
        let entry = self.entries.entry(point_id.to_string()).or_default();
        entry.value = value.into();
        entry.notes = notes.into();
        Ok(())
    }

    /// 查看测点草稿
    pub fn entry(&self, point_id: &str) -> Option<&PointEntry> {
        self.entries.get(point_id)
    }

    /// 该测点当前是否允许标记完成
    ///
    /// 成立条件：值通过校验，且（无需备注，或备注已实际填写）。
    pub fn can_mark_complete(&self, point: &ReadingPointRecord) -> bool {
        let entry = match self.entries.get(&point.point_id) {
            Some(entry) => entry,
            None => return false,
        };
        if !rounds_validation::is_value_valid(point, &entry.value) {
            return false;
        }
        !rounds_validation::requires_comment(point, &entry.value)
            || rounds_validation::comment_provided(Some(&entry.notes))
    }

    /// 标记测点完成，锁定其草稿并采集完成时间戳
    pub fn mark_complete(
        &mut self,
        point: &ReadingPointRecord,
        ctx: &SessionContext,
    ) -> Result<PointCompletion, CollectionError> {
        if self.completions.contains_key(&point.point_id) {
            return Err(CollectionError::Locked(point.point_id.clone()));
        }
        let entry = self
            .entries
            .get(&point.point_id)
            .ok_or_else(|| CollectionError::MissingEntry(point.point_id.clone()))?;
        if !self.can_mark_complete(point) {
            return Err(CollectionError::NotCompletable(point.point_id.clone()));
        }
        let completion = PointCompletion {
            point_id: point.point_id.clone(),
            completed_at: Utc::now(),
            completed_by: (!ctx.user_id.is_empty()).then(|| ctx.user_id.clone()),
            value: entry.value.clone(),
            notes: (!entry.notes.trim().is_empty()).then(|| entry.notes.clone()),
        };
        self.completions
            .insert(point.point_id.clone(), completion.clone());
        record_completion_marked();
        Ok(completion)
    }

    /// 撤销完成标记；永远允许，已录入的草稿保持原值
    pub fn unmark_complete(&mut self, point_id: &str) -> bool {
        let removed = self.completions.remove(point_id).is_some();
        if removed {
            record_completion_reverted();
        }
        removed
    }

    /// 测点是否处于完成状态
    pub fn is_complete(&self, point_id: &str) -> bool {
        self.completions.contains_key(point_id)
    }

    /// 已完成测点的 ID 集合
    pub fn completed_point_ids(&self) -> HashSet<String> {
        self.completions.keys().cloned().collect()
    }

    /// 查看测点的完成记录
    pub fn completion(&self, point_id: &str) -> Option<&PointCompletion> {
        self.completions.get(point_id)
    }

    /// 按给定测点顺序取出完成记录（用于按清单顺序组批）
    pub fn completions_in_order(&self, point_ids: &[String]) -> Vec<PointCompletion> {
        point_ids
            .iter()
            .filter_map(|point_id| self.completions.get(point_id).cloned())
            .collect()
    }

    /// 全部完成记录
    pub fn completions(&self) -> Vec<PointCompletion> {
        self.completions.values().cloned().collect()
    }

    /// 清空会话（页签关闭语义）
    pub fn clear(&mut self) {
        self.entries.clear();
        self.completions.clear();
    }
}

impl Default for CollectionSession {
    fn default() -> Self {
        Self::new()
    }
}
