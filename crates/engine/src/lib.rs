//! 装配层：面向嵌入方的组合根。
//!
//! 渲染/表单协作方（超出本仓库范围）持有一个 [`Engine`]，
//! 通过其上的服务完成全部操作；Engine 自身不承载业务规则，
//! 只负责按配置把仓储、策略与通知钩子接成一个整体。
//!
//! 每个页签/会话是独立副本：采集会话用 [`Engine::new_session`]
//! 创建，随页签关闭丢弃，不参与持久化。

use rounds_catalog::CatalogService;
use rounds_collection::CollectionSession;
use rounds_config::AppConfig;
use rounds_projection::ReadingProjection;
use rounds_review::{LogNotifier, ReviewNotifier, ReviewService};
use rounds_storage::{
    BlobStore, FileBlobStore, InMemoryListStore, InMemoryPointStore, InMemoryReadingStore,
    InMemorySubmissionStore, InMemoryUserStore, ListStore, PointStore, ReadingStore,
    SubmissionStore, UserStore,
};
use rounds_submission::{SubmissionPolicy, SubmissionService};
use std::sync::Arc;

/// 装配错误。
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("storage error: {0}")]
    Storage(String),
}

/// 组合根：仓储 + 服务 + 会话工厂。
pub struct Engine {
    pub points: Arc<dyn PointStore>,
    pub lists: Arc<dyn ListStore>,
    pub readings: Arc<dyn ReadingStore>,
    pub submissions: Arc<dyn SubmissionStore>,
    pub users: Arc<dyn UserStore>,
    pub catalog: CatalogService,
    pub projection: ReadingProjection,
    pub submission: SubmissionService,
    pub review: ReviewService,
}

impl Engine {
    /// 按配置装配。
    ///
    /// 设置了数据目录时启用文件快照持久化，否则为易失副本；
    /// 通知钩子默认写结构化日志，真实投递由嵌入方替换。
    pub fn from_config(config: &AppConfig) -> Result<Self, EngineError> {
        let policy = SubmissionPolicy {
            allow_adhoc_points: config.allow_adhoc_points,
            review_enabled: config.review_enabled,
        };
        let blobs: Option<Arc<dyn BlobStore>> = match &config.data_dir {
            Some(dir) => Some(Arc::new(
                FileBlobStore::open(dir).map_err(|err| EngineError::Storage(err.to_string()))?,
            )),
            None => None,
        };
        Ok(Self::assemble(blobs, Arc::new(LogNotifier), policy))
    }

    /// 易失装配（测试与演示）。
    pub fn volatile() -> Self {
        Self::assemble(None, Arc::new(LogNotifier), SubmissionPolicy::default())
    }

    /// 显式装配：自定义键值存储、通知钩子与提交策略。
    pub fn assemble(
        blobs: Option<Arc<dyn BlobStore>>,
        notifier: Arc<dyn ReviewNotifier>,
        policy: SubmissionPolicy,
    ) -> Self {
        let (points, lists, readings, submissions, users): (
            Arc<dyn PointStore>,
            Arc<dyn ListStore>,
            Arc<dyn ReadingStore>,
            Arc<dyn SubmissionStore>,
            Arc<dyn UserStore>,
        ) = match blobs {
            Some(blobs) => (
                Arc::new(InMemoryPointStore::with_snapshot(blobs.clone())),
                Arc::new(InMemoryListStore::with_snapshot(blobs.clone())),
                Arc::new(InMemoryReadingStore::with_snapshot(blobs.clone())),
                Arc::new(InMemorySubmissionStore::with_snapshot(blobs.clone())),
                Arc::new(InMemoryUserStore::with_snapshot(blobs)),
            ),
            None => (
                Arc::new(InMemoryPointStore::new()),
                Arc::new(InMemoryListStore::new()),
                Arc::new(InMemoryReadingStore::new()),
                Arc::new(InMemorySubmissionStore::new()),
                Arc::new(InMemoryUserStore::new()),
            ),
        };

        let catalog = CatalogService::new(points.clone(), lists.clone());
        let projection = ReadingProjection::new(readings.clone(), points.clone());
        let submission = SubmissionService::new(
            points.clone(),
            readings.clone(),
            submissions.clone(),
            notifier.clone(),
            policy,
        );
        let review = ReviewService::new(
            submissions.clone(),
            readings.clone(),
            users.clone(),
            notifier,
        );

        Self {
            points,
            lists,
            readings,
            submissions,
            users,
            catalog,
            projection,
            submission,
            review,
        }
    }

    /// 新建页签级采集会话。
    pub fn new_session(&self) -> CollectionSession {
        CollectionSession::new()
    }
}
