//! 审核通知钩子。
//!
//! 核心只暴露事件挂点，不实现投递；投递结果绝不影响已提交
//! 的状态转移。

use async_trait::async_trait;
use domain::Role;
use rounds_storage::ReviewSubmissionRecord;
use tracing::info;

/// 通知投递错误。
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("delivery error: {0}")]
    Delivery(String),
}

/// 审核通知协作方抽象。
#[async_trait]
pub trait ReviewNotifier: Send + Sync {
    /// 新建待审提交单后，通知审核方角色
    async fn submission_created(
        &self,
        submission: &ReviewSubmissionRecord,
        reviewer_roles: &[Role],
        submitter_name: &str,
    ) -> Result<(), NotifyError>;

    /// 终态转移后，通知原提交人
    async fn submission_reviewed(
        &self,
        submission: &ReviewSubmissionRecord,
        submitter_email: Option<&str>,
        submitter_name: &str,
        reviewer_name: &str,
    ) -> Result<(), NotifyError>;
}

/// 空通知器（用于接线与测试）。
#[derive(Debug, Default)]
pub struct NoopNotifier;

#[async_trait]
impl ReviewNotifier for NoopNotifier {
    async fn submission_created(
        &self,
        _submission: &ReviewSubmissionRecord,
        _reviewer_roles: &[Role],
        _submitter_name: &str,
    ) -> Result<(), NotifyError> {
        Ok(())
    }

    async fn submission_reviewed(
        &self,
        _submission: &ReviewSubmissionRecord,
        _submitter_email: Option<&str>,
        _submitter_name: &str,
        _reviewer_name: &str,
    ) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// 日志通知器：把通知事件写入结构化日志。
///
/// 默认实现；真实投递（邮件等）由嵌入方的外部协作方承担。
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl ReviewNotifier for LogNotifier {
    async fn submission_created(
        &self,
        submission: &ReviewSubmissionRecord,
        reviewer_roles: &[Role],
        submitter_name: &str,
    ) -> Result<(), NotifyError> {
        let roles: Vec<&str> = reviewer_roles.iter().map(|role| role.as_str()).collect();
        info!(
            target: "rounds.review",
            submission_id = %submission.submission_id,
            submitter = %submitter_name,
            reviewer_roles = ?roles,
            readings = submission.readings.len(),
            "submission_created"
        );
        Ok(())
    }

    async fn submission_reviewed(
        &self,
        submission: &ReviewSubmissionRecord,
        submitter_email: Option<&str>,
        submitter_name: &str,
        reviewer_name: &str,
    ) -> Result<(), NotifyError> {
        info!(
            target: "rounds.review",
            submission_id = %submission.submission_id,
            status = %submission.status,
            submitter = %submitter_name,
            submitter_email = submitter_email.unwrap_or(""),
            reviewer = %reviewer_name,
            "submission_reviewed"
        );
        Ok(())
    }
}
