//! 存储接口 Trait 定义
//!
//! 定义所有资源存储的异步接口：
//! - PointStore：测点存储
//! - ListStore：清单存储
//! - ReadingStore：读数存储（插入序，只增不改）
//! - SubmissionStore：提交单存储
//! - UserStore：用户目录存储
//!
//! 设计原则：
//! - 所有接口显式接收 SessionContext
//! - 所有接口返回 StorageError
//! - 使用 async_trait 支持动态分发

use crate::error::StorageError;
use crate::models::{
    BuildingReadingRecord, ReadingListRecord, ReadingListUpdate, ReadingPointRecord,
    ReadingPointUpdate, ReviewStamp, ReviewSubmissionRecord, UserRecord,
};
use async_trait::async_trait;
use domain::SessionContext;

/// 时间排序方向。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOrder {
    Asc,
    Desc,
}

/// 测点存储接口
///
/// 提供测点 CRUD 操作；变更操作要求台账管理角色。
#[async_trait]
pub trait PointStore: Send + Sync {
    /// 列出所有测点
    async fn list_points(
        &self,
        ctx: &SessionContext,
    ) -> Result<Vec<ReadingPointRecord>, StorageError>;

    /// 查找指定测点
    async fn find_point(
        &self,
        ctx: &SessionContext,
        point_id: &str,
    ) -> Result<Option<ReadingPointRecord>, StorageError>;

    /// 创建新测点
    async fn create_point(
        &self,
        ctx: &SessionContext,
        record: ReadingPointRecord,
    ) -> Result<ReadingPointRecord, StorageError>;

    /// 部分更新测点
    async fn update_point(
        &self,
        ctx: &SessionContext,
        point_id: &str,
        update: ReadingPointUpdate,
    ) -> Result<Option<ReadingPointRecord>, StorageError>;

    /// 删除测点（硬删除，无软删除或版本化）
    async fn delete_point(
        &self,
        ctx: &SessionContext,
        point_id: &str,
    ) -> Result<bool, StorageError>;
}

/// 清单存储接口
///
/// 提供清单 CRUD 操作；变更操作要求台账管理角色。
#[async_trait]
pub trait ListStore: Send + Sync {
    /// 列出所有清单
    async fn list_lists(
        &self,
        ctx: &SessionContext,
    ) -> Result<Vec<ReadingListRecord>, StorageError>;

    /// 查找指定清单
    async fn find_list(
        &self,
        ctx: &SessionContext,
        list_id: &str,
    ) -> Result<Option<ReadingListRecord>, StorageError>;

    /// 创建新清单
    async fn create_list(
        &self,
        ctx: &SessionContext,
        record: ReadingListRecord,
    ) -> Result<ReadingListRecord, StorageError>;

    /// 部分更新清单
    async fn update_list(
        &self,
        ctx: &SessionContext,
        list_id: &str,
        update: ReadingListUpdate,
    ) -> Result<Option<ReadingListRecord>, StorageError>;

    /// 删除清单
    async fn delete_list(&self, ctx: &SessionContext, list_id: &str)
        -> Result<bool, StorageError>;
}

/// 读数存储接口
///
/// 读数是插入序序列：只能整批追加、按 ID 删除，不存在更新操作。
#[async_trait]
pub trait ReadingStore: Send + Sync {
    /// 按插入序列出全部读数
    async fn list_readings(
        &self,
        ctx: &SessionContext,
    ) -> Result<Vec<BuildingReadingRecord>, StorageError>;

    /// 原子追加一批读数，返回追加条数
    async fn append_readings(
        &self,
        ctx: &SessionContext,
        readings: &[BuildingReadingRecord],
    ) -> Result<usize, StorageError>;

    /// 按 ID 删除读数（无级联效应）
    async fn remove_reading(
        &self,
        ctx: &SessionContext,
        reading_id: &str,
    ) -> Result<bool, StorageError>;
}

/// 提交单存储接口
///
/// 提交单只增不删：终态记录永久保留为审计条目。
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// 列出全部提交单
    async fn list_submissions(
        &self,
        ctx: &SessionContext,
    ) -> Result<Vec<ReviewSubmissionRecord>, StorageError>;

    /// 列出待审提交单（要求审核角色）
    async fn list_pending(
        &self,
        ctx: &SessionContext,
    ) -> Result<Vec<ReviewSubmissionRecord>, StorageError>;

    /// 列出指定提交人的提交单
    async fn list_by_submitter(
        &self,
        ctx: &SessionContext,
        user_id: &str,
    ) -> Result<Vec<ReviewSubmissionRecord>, StorageError>;

    /// 查找指定提交单
    async fn find_submission(
        &self,
        ctx: &SessionContext,
        submission_id: &str,
    ) -> Result<Option<ReviewSubmissionRecord>, StorageError>;

    /// 创建新提交单
    async fn create_submission(
        &self,
        ctx: &SessionContext,
        record: ReviewSubmissionRecord,
    ) -> Result<ReviewSubmissionRecord, StorageError>;

    /// 写入审核落章（要求审核角色；状态机约束由审核层保证）
    async fn apply_review(
        &self,
        ctx: &SessionContext,
        submission_id: &str,
        stamp: ReviewStamp,
    ) -> Result<Option<ReviewSubmissionRecord>, StorageError>;
}

/// 用户目录存储接口
///
/// 身份协作方的数据源；核心只读取 ID、显示名、邮箱与角色。
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 列出全部用户
    async fn list_users(&self, ctx: &SessionContext) -> Result<Vec<UserRecord>, StorageError>;

    /// 根据用户 ID 查找用户
    async fn find_user(
        &self,
        ctx: &SessionContext,
        user_id: &str,
    ) -> Result<Option<UserRecord>, StorageError>;

    /// 根据用户名查找用户
    async fn find_by_username(
        &self,
        ctx: &SessionContext,
        username: &str,
    ) -> Result<Option<UserRecord>, StorageError>;

    /// 创建或整体替换用户记录（要求台账管理角色）
    async fn upsert_user(
        &self,
        ctx: &SessionContext,
        record: UserRecord,
    ) -> Result<UserRecord, StorageError>;
}
