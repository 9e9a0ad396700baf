//! 提交能力：把完成的录入批次组装为规范读数记录。
//!
//! 组装后的批次有两个去向，由调用方策略（而非本组件）选择：
//! - 免审路径：直接追加进全局读数仓储
//! - 送审路径：连同提交人、清单引用与备注包装成待审提交单
//!
//! 前置校验失败（未选清单、空批次、值未通过校验）会拒绝整个
//! 操作；引用了不存在测点的批次整体中止，绝不静默丢弃坏条目。

use chrono::{DateTime, Utc};
use domain::{roles, SessionContext};
use rounds_collection::PointCompletion;
use rounds_review::ReviewNotifier;
use rounds_storage::{
    BuildingReadingRecord, PointStore, ReadingListRecord, ReadingPointRecord, ReadingStore,
    ReviewSubmissionRecord, SubmissionStore,
};
use rounds_telemetry::{
    record_notify_failure, record_readings_committed, record_submission_created,
    record_value_rejected,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// 提交策略（由嵌入方从配置映射而来）。
#[derive(Debug, Clone)]
pub struct SubmissionPolicy {
    /// 是否允许不选清单、逐点自由录入
    pub allow_adhoc_points: bool,
    /// 是否启用送审流程；关闭后所有提交直接入库
    pub review_enabled: bool,
}

impl Default for SubmissionPolicy {
    fn default() -> Self {
        Self {
            allow_adhoc_points: false,
            review_enabled: true,
        }
    }
}

/// 提交错误。
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("a list must be selected before submitting")]
    ListRequired,
    #[error("no completed entries to submit")]
    NoEntries,
    #[error("invalid value for point: {0}")]
    InvalidValue(String),
    #[error("unknown point: {0}")]
    UnknownPoint(String),
    #[error("storage error: {0}")]
    Storage(String),
}

/// 提交结果：直接入库的条数，或新建的待审提交单。
#[derive(Debug)]
pub enum SubmissionOutcome {
    Committed { count: usize },
    PendingReview(ReviewSubmissionRecord),
}

/// 把完成记录组装为读数批次。
///
/// 整批共用同一时间戳；任何条目引用未知测点即整批失败。
pub fn build_readings(
    entries: &[PointCompletion],
    points: &HashMap<String, ReadingPointRecord>,
    recorded_by: Option<&str>,
    recorded_at: DateTime<Utc>,
) -> Result<Vec<BuildingReadingRecord>, SubmissionError> {
    let mut readings = Vec::with_capacity(entries.len());
    for entry in entries {
        let point = points
            .get(&entry.point_id)
            .ok_or_else(|| SubmissionError::UnknownPoint(entry.point_id.clone()))?;
        let value = rounds_validation::parse_value(point, &entry.value).ok_or_else(|| {
            record_value_rejected();
            SubmissionError::InvalidValue(entry.point_id.clone())
        })?;
        readings.push(BuildingReadingRecord {
            reading_id: Uuid::new_v4().to_string(),
            building: point.building.clone(),
            floor: point.floor.clone(),
            room: point.room.clone(),
            reading_type: point.reading_type.clone(),
            value,
            unit: point.unit.clone(),
            recorded_at,
            notes: entry.notes.clone(),
            recorded_by: recorded_by.map(|name| name.to_string()),
            point_id: Some(point.point_id.clone()),
        });
    }
    Ok(readings)
}

/// 提交服务：前置校验 + 批次组装 + 两个去向。
pub struct SubmissionService {
    point_store: Arc<dyn PointStore>,
    reading_store: Arc<dyn ReadingStore>,
    submission_store: Arc<dyn SubmissionStore>,
    notifier: Arc<dyn ReviewNotifier>,
    policy: SubmissionPolicy,
}

impl SubmissionService {
    /// 创建提交服务实例。
    pub fn new(
        point_store: Arc<dyn PointStore>,
        reading_store: Arc<dyn ReadingStore>,
        submission_store: Arc<dyn SubmissionStore>,
        notifier: Arc<dyn ReviewNotifier>,
        policy: SubmissionPolicy,
    ) -> Self {
        Self {
            point_store,
            reading_store,
            submission_store,
            notifier,
            policy,
        }
    }

    /// 按角色策略路由提交：免审角色直接入库，其余送审。
    pub async fn submit(
        &self,
        ctx: &SessionContext,
        entries: &[PointCompletion],
        source_list: Option<&ReadingListRecord>,
        notes: Option<String>,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        if !self.policy.review_enabled || ctx.bypasses_review() {
            let count = self.commit_direct(ctx, entries, source_list).await?;
            Ok(SubmissionOutcome::Committed { count })
        } else {
            let submission = self
                .submit_for_review(ctx, entries, source_list, notes)
                .await?;
            Ok(SubmissionOutcome::PendingReview(submission))
        }
    }

    /// 免审路径：组装批次并直接追加进读数仓储。
    pub async fn commit_direct(
        &self,
        ctx: &SessionContext,
        entries: &[PointCompletion],
        source_list: Option<&ReadingListRecord>,
    ) -> Result<usize, SubmissionError> {
        let readings = self.prepare(ctx, entries, source_list).await?;
        let count = self
            .reading_store
            .append_readings(ctx, &readings)
            .await
            .map_err(|err| SubmissionError::Storage(err.to_string()))?;
        record_readings_committed(count as u64);
        info!(
            target: "rounds.submission",
            user = %ctx.user_id,
            list_id = source_list.map(|list| list.list_id.as_str()).unwrap_or(""),
            readings = count,
            "batch_committed"
        );
        Ok(count)
    }

    /// 送审路径：组装批次并包装为待审提交单，随后通知审核方。
    pub async fn submit_for_review(
        &self,
        ctx: &SessionContext,
        entries: &[PointCompletion],
        source_list: Option<&ReadingListRecord>,
        notes: Option<String>,
    ) -> Result<ReviewSubmissionRecord, SubmissionError> {
        let readings = self.prepare(ctx, entries, source_list).await?;
        let record = ReviewSubmissionRecord {
            submission_id: Uuid::new_v4().to_string(),
            submitted_by: ctx.user_id.clone(),
            submitter_name: ctx.display_name.clone(),
            submitted_at: Utc::now(),
            list_id: source_list.map(|list| list.list_id.clone()),
            list_name: source_list.map(|list| list.name.clone()),
            readings,
            notes,
            status: domain::ReviewStatus::Pending,
            reviewed_by: None,
            reviewer_name: None,
            reviewed_at: None,
            review_comments: None,
        };
        let created = self
            .submission_store
            .create_submission(ctx, record)
            .await
            .map_err(|err| SubmissionError::Storage(err.to_string()))?;
        record_submission_created();
        info!(
            target: "rounds.submission",
            submission_id = %created.submission_id,
            user = %ctx.user_id,
            readings = created.readings.len(),
            "submission_created"
        );

        // 通知审核方角色；投递失败不影响已创建的提交单
        let reviewer_roles = roles::reviewer_notification_roles();
        if let Err(err) = self
            .notifier
            .submission_created(&created, &reviewer_roles, &ctx.display_name)
            .await
        {
            warn!(
                target: "rounds.submission",
                submission_id = %created.submission_id,
                error = %err,
                "reviewer notification failed"
            );
            record_notify_failure();
        }
        Ok(created)
    }

    /// 前置校验并组装批次。
    async fn prepare(
        &self,
        ctx: &SessionContext,
        entries: &[PointCompletion],
        source_list: Option<&ReadingListRecord>,
    ) -> Result<Vec<BuildingReadingRecord>, SubmissionError> {
        if !self.policy.allow_adhoc_points && source_list.is_none() {
            return Err(SubmissionError::ListRequired);
        }
        if entries.is_empty() {
            return Err(SubmissionError::NoEntries);
        }
        let points: HashMap<String, ReadingPointRecord> = self
            .point_store
            .list_points(ctx)
            .await
            .map_err(|err| SubmissionError::Storage(err.to_string()))?
            .into_iter()
            .map(|point| (point.point_id.clone(), point))
            .collect();
        let recorded_by = (!ctx.display_name.is_empty()).then_some(ctx.display_name.as_str());
        build_readings(entries, &points, recorded_by, Utc::now())
    }
}
