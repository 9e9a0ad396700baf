//! 提交单内存仓储实现
//!
//! 提交单按提交序保存，只增不删；审核落章整体写入审核字段。
//! 待审列表要求审核角色，提交人可查询自己的历史提交。

use crate::error::StorageError;
use crate::kv::BlobStore;
use crate::models::{ReviewStamp, ReviewSubmissionRecord};
use crate::snapshot::{keys, SnapshotSink};
use crate::traits::SubmissionStore;
use crate::validation::{ensure_identified, ensure_reviewer};
use domain::{ReviewStatus, SessionContext};
use std::sync::{Arc, RwLock};

/// 提交单内存仓储
pub struct InMemorySubmissionStore {
    submissions: RwLock<Vec<ReviewSubmissionRecord>>,
    snapshot: Option<SnapshotSink>,
}

impl InMemorySubmissionStore {
    /// 创建易失仓储
    pub fn new() -> Self {
        Self {
            submissions: RwLock::new(Vec::new()),
            snapshot: None,
        }
    }

    /// 创建快照写穿仓储，并从快照加载初始集合
    pub fn with_snapshot(blobs: Arc<dyn BlobStore>) -> Self {
        let snapshot = SnapshotSink::new(blobs, keys::SUBMISSIONS);
        let submissions = snapshot.load::<ReviewSubmissionRecord>();
        Self {
            submissions: RwLock::new(submissions),
            snapshot: Some(snapshot),
        }
    }

    fn persist(&self, items: &[ReviewSubmissionRecord]) {
        if let Some(snapshot) = &self.snapshot {
            snapshot.save(items);
        }
    }
}

impl Default for InMemorySubmissionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SubmissionStore for InMemorySubmissionStore {
    /// 列出全部提交单
    async fn list_submissions(
        &self,
        ctx: &SessionContext,
    ) -> Result<Vec<ReviewSubmissionRecord>, StorageError> {
        ensure_identified(ctx)?;
        let items = self
            .submissions
            .read()
            .map(|items| items.clone())
            .unwrap_or_default();
        Ok(items)
    }

    /// 列出待审提交单
    async fn list_pending(
        &self,
        ctx: &SessionContext,
    ) -> Result<Vec<ReviewSubmissionRecord>, StorageError> {
        ensure_reviewer(ctx)?;
        let items = self
            .submissions
            .read()
            .map(|items| {
                items
                    .iter()
                    .filter(|item| item.status == ReviewStatus::Pending)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(items)
    }

    /// 列出指定提交人的提交单
    async fn list_by_submitter(
        &self,
        ctx: &SessionContext,
        user_id: &str,
    ) -> Result<Vec<ReviewSubmissionRecord>, StorageError> {
        ensure_identified(ctx)?;
        let items = self
            .submissions
            .read()
            .map(|items| {
                items
                    .iter()
                    .filter(|item| item.submitted_by == user_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(items)
    }

    /// 查找指定提交单
    async fn find_submission(
        &self,
        ctx: &SessionContext,
        submission_id: &str,
    ) -> Result<Option<ReviewSubmissionRecord>, StorageError> {
        ensure_identified(ctx)?;
        let item = self.submissions.read().ok().and_then(|items| {
            items
                .iter()
                .find(|item| item.submission_id == submission_id)
                .cloned()
        });
        Ok(item)
    }

    /// 创建新提交单
    async fn create_submission(
        &self,
        ctx: &SessionContext,
        record: ReviewSubmissionRecord,
    ) -> Result<ReviewSubmissionRecord, StorageError> {
        ensure_identified(ctx)?;
        let mut items = self
            .submissions
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if items
            .iter()
            .any(|item| item.submission_id == record.submission_id)
        {
            return Err(StorageError::new("submission exists"));
        }
        items.push(record.clone());
        self.persist(&items);
        Ok(record)
    }

    /// 写入审核落章
    async fn apply_review(
        &self,
        ctx: &SessionContext,
        submission_id: &str,
        stamp: ReviewStamp,
    ) -> Result<Option<ReviewSubmissionRecord>, StorageError> {
        ensure_reviewer(ctx)?;
        let mut items = self
            .submissions
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let submission = match items
            .iter_mut()
            .find(|item| item.submission_id == submission_id)
        {
            Some(submission) => submission,
            None => return Ok(None),
        };
        submission.status = stamp.status;
        submission.reviewed_by = Some(stamp.reviewed_by);
        submission.reviewer_name = Some(stamp.reviewer_name);
        submission.reviewed_at = Some(stamp.reviewed_at);
        submission.review_comments = stamp.review_comments;
        let updated = submission.clone();
        self.persist(&items);
        Ok(Some(updated))
    }
}
