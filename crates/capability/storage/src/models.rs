//! 数据模型
//!
//! 定义所有存储相关的数据模型和更新结构：
//! - 测点模型：ReadingPointRecord, ReadingPointUpdate
//! - 清单模型：ReadingListRecord, ReadingListUpdate
//! - 读数模型：BuildingReadingRecord
//! - 提交单模型：ReviewSubmissionRecord, ReviewStamp
//! - 用户目录模型：UserRecord

use chrono::{DateTime, NaiveDate, Utc};
use domain::{ReadingValue, ReviewStatus, Role, ValidationMode};
use serde::{Deserialize, Serialize};

/// 测点记录：受监控的位置 + 指标定义。
///
/// `reading_type` 是开放字符串（管理员可自定义类型）；
/// `min_value`/`max_value` 仅在 `ValidationMode::Range` 下有意义。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingPointRecord {
    pub point_id: String,
    pub name: String,
    pub building: String,
    pub floor: String,
    pub room: String,
    pub reading_type: String,
    pub component: Option<String>,
    pub unit: String,
    pub description: Option<String>,
    pub validation_mode: ValidationMode,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// 测点部分更新输入。
#[derive(Debug, Clone, Default)]
pub struct ReadingPointUpdate {
    pub name: Option<String>,
    pub building: Option<String>,
    pub floor: Option<String>,
    pub room: Option<String>,
    pub reading_type: Option<String>,
    pub component: Option<String>,
    pub unit: Option<String>,
    pub description: Option<String>,
    pub validation_mode: Option<ValidationMode>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub active: Option<bool>,
}

/// 清单记录：按插入序排列的测点 ID 集合。
///
/// `is_model = true` 的清单是仅供复制的模板，绝不可被选为
/// 数据录入对象。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingListRecord {
    pub list_id: String,
    pub name: String,
    pub point_ids: Vec<String>,
    pub expected_completion_date: Option<NaiveDate>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_model: bool,
}

/// 清单部分更新输入。
///
/// `expected_completion_date` 为双层 Option：`Some(None)` 表示清除日期。
#[derive(Debug, Clone, Default)]
pub struct ReadingListUpdate {
    pub name: Option<String>,
    pub point_ids: Option<Vec<String>>,
    pub expected_completion_date: Option<Option<NaiveDate>>,
    pub is_model: Option<bool>,
}

/// 已入库读数记录。入库后不可变，只能整条删除。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingReadingRecord {
    pub reading_id: String,
    pub building: String,
    pub floor: String,
    pub room: String,
    pub reading_type: String,
    pub value: ReadingValue,
    pub unit: String,
    pub recorded_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub recorded_by: Option<String>,
    pub point_id: Option<String>,
}

/// 提交单记录：等待审核的读数批次。
///
/// 状态只会从 `Pending` 单向离开；`NeedsRevision` 的提交单
/// 永久保留为审计记录，修正走全新提交。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewSubmissionRecord {
    pub submission_id: String,
    pub submitted_by: String,
    pub submitter_name: String,
    pub submitted_at: DateTime<Utc>,
    pub list_id: Option<String>,
    pub list_name: Option<String>,
    pub readings: Vec<BuildingReadingRecord>,
    pub notes: Option<String>,
    pub status: ReviewStatus,
    pub reviewed_by: Option<String>,
    pub reviewer_name: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub review_comments: Option<String>,
}

/// 审核落章：一次审核动作写入提交单的全部字段。
#[derive(Debug, Clone)]
pub struct ReviewStamp {
    pub status: ReviewStatus,
    pub reviewed_by: String,
    pub reviewer_name: String,
    pub reviewed_at: DateTime<Utc>,
    pub review_comments: Option<String>,
}

/// 用户目录记录：身份协作方的数据源（不含任何凭据）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: String,
    pub username: String,
    pub display_name: String,
    pub email: Option<String>,
    pub roles: Vec<Role>,
}

impl UserRecord {
    /// 将用户记录转换为 SessionContext。
    pub fn to_session_context(&self) -> domain::SessionContext {
        domain::SessionContext::new(
            self.user_id.clone(),
            self.display_name.clone(),
            self.email.clone(),
            self.roles.clone(),
        )
    }
}
