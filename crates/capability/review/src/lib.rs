//! 审核能力：提交单的审批状态机。
//!
//! 状态机：`pending → { approved, rejected, needs_revision }`。
//! `pending` 是唯一非终态；对非待审提交单派发审核动作会被
//! 拒绝并报错，绝不静默重放。批准是读数进入全局读数仓储的
//! 唯一送审路径；驳回与要求返工不触碰读数仓储。

mod notifier;

pub use notifier::{LogNotifier, NoopNotifier, NotifyError, ReviewNotifier};

use chrono::Utc;
use domain::{ReviewStatus, SessionContext};
use rounds_storage::{ReadingStore, ReviewStamp, ReviewSubmissionRecord, SubmissionStore, UserStore};
use rounds_telemetry::{
    record_notify_failure, record_readings_committed, record_revision_requested,
    record_submission_approved, record_submission_rejected,
};
use std::sync::Arc;
use tracing::{info, warn};

/// 审核动作。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Approve,
    Reject,
    RequestRevision,
}

impl ReviewAction {
    /// 动作对应的终态。
    pub fn status(&self) -> ReviewStatus {
        match self {
            Self::Approve => ReviewStatus::Approved,
            Self::Reject => ReviewStatus::Rejected,
            Self::RequestRevision => ReviewStatus::NeedsRevision,
        }
    }
}

/// 审核错误。
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("reviewer role required")]
    Forbidden,
    #[error("submission not found: {0}")]
    NotFound(String),
    #[error("submission not pending: {0} ({1})")]
    NotPending(String, ReviewStatus),
    #[error("storage error: {0}")]
    Storage(String),
}

/// 审核服务：状态机 + 批准入库 + 通知钩子。
pub struct ReviewService {
    submission_store: Arc<dyn SubmissionStore>,
    reading_store: Arc<dyn ReadingStore>,
    user_store: Arc<dyn UserStore>,
    notifier: Arc<dyn ReviewNotifier>,
}

impl ReviewService {
    /// 创建审核服务实例。
    pub fn new(
        submission_store: Arc<dyn SubmissionStore>,
        reading_store: Arc<dyn ReadingStore>,
        user_store: Arc<dyn UserStore>,
        notifier: Arc<dyn ReviewNotifier>,
    ) -> Self {
        Self {
            submission_store,
            reading_store,
            user_store,
            notifier,
        }
    }

    /// 列出待审提交单。
    pub async fn pending(
        &self,
        ctx: &SessionContext,
    ) -> Result<Vec<ReviewSubmissionRecord>, ReviewError> {
        self.submission_store
            .list_pending(ctx)
            .await
            .map_err(|err| ReviewError::Storage(err.to_string()))
    }

    /// 对待审提交单派发审核动作。
    ///
    /// 批准动作先把读数批次原子追加进读数仓储，再写入审核落章；
    /// 追加失败时提交单保持待审。通知投递失败只记录日志与计数。
    pub async fn review(
        &self,
        ctx: &SessionContext,
        submission_id: &str,
        action: ReviewAction,
        comments: Option<String>,
    ) -> Result<ReviewSubmissionRecord, ReviewError> {
        if !ctx.can_review() {
            return Err(ReviewError::Forbidden);
        }
        let submission = self
            .submission_store
            .find_submission(ctx, submission_id)
            .await
            .map_err(|err| ReviewError::Storage(err.to_string()))?
            .ok_or_else(|| ReviewError::NotFound(submission_id.to_string()))?;
        if submission.status != ReviewStatus::Pending {
            return Err(ReviewError::NotPending(
                submission_id.to_string(),
                submission.status,
            ));
        }

        if action == ReviewAction::Approve {
            let committed = self
                .reading_store
                .append_readings(ctx, &submission.readings)
                .await
                .map_err(|err| ReviewError::Storage(err.to_string()))?;
            record_readings_committed(committed as u64);
        }

        let stamp = ReviewStamp {
            status: action.status(),
            reviewed_by: ctx.user_id.clone(),
            reviewer_name: ctx.display_name.clone(),
            reviewed_at: Utc::now(),
            review_comments: comments,
        };
        let updated = self
            .submission_store
            .apply_review(ctx, submission_id, stamp)
            .await
            .map_err(|err| ReviewError::Storage(err.to_string()))?
            .ok_or_else(|| ReviewError::NotFound(submission_id.to_string()))?;

        match action {
            ReviewAction::Approve => record_submission_approved(),
            ReviewAction::Reject => record_submission_rejected(),
            ReviewAction::RequestRevision => record_revision_requested(),
        }
        info!(
            target: "rounds.review",
            submission_id = %updated.submission_id,
            status = %updated.status,
            reviewer = %ctx.user_id,
            readings = updated.readings.len(),
            "review_applied"
        );

        // 终态通知提交人；投递失败不回滚已提交的转移
        let submitter_email = self
            .user_store
            .find_user(ctx, &updated.submitted_by)
            .await
            .ok()
            .flatten()
            .and_then(|user| user.email);
        if let Err(err) = self
            .notifier
            .submission_reviewed(
                &updated,
                submitter_email.as_deref(),
                &updated.submitter_name,
                &ctx.display_name,
            )
            .await
        {
            warn!(
                target: "rounds.review",
                submission_id = %updated.submission_id,
                error = %err,
                "submitter notification failed"
            );
            record_notify_failure();
        }

        Ok(updated)
    }
}
