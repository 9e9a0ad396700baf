//! 台账管理能力：测点与清单的管理员操作。
//!
//! 入口处统一做输入规整与校验：
//! - 必填字段去除首尾空白后不得为空
//! - 预期完成日期按 `YYYY-MM-DD` 严格解析，畸形输入直接拒绝
//! - 量程上下限同时给出时必须 min ≤ max
//! - 清单引用的测点必须存在，整单校验、整单拒绝
//!
//! 角色门禁由存储层统一执行（台账变更需要管理员级角色）。

use chrono::{NaiveDate, Utc};
use domain::dates::parse_calendar_date;
use domain::{SessionContext, ValidationMode};
use rounds_storage::{
    ListStore, PointStore, ReadingListRecord, ReadingListUpdate, ReadingPointRecord,
    ReadingPointUpdate,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// 台账操作错误。
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("invalid calendar date: {0}")]
    InvalidDate(String),
    #[error("min bound exceeds max bound")]
    InvertedBounds,
    #[error("point not found: {0}")]
    PointNotFound(String),
    #[error("list not found: {0}")]
    ListNotFound(String),
    #[error("storage error: {0}")]
    Storage(String),
}

/// 新建测点输入。
#[derive(Debug, Clone)]
pub struct NewPoint {
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
}

/// 新建清单输入；日期以原文字符串进入，在此严格校验。
#[derive(Debug, Clone)]
pub struct NewList {
    pub name: String,
    pub point_ids: Vec<String>,
    pub expected_completion_date: Option<String>,
    pub is_model: bool,
}

/// 清单部分更新输入；`expected_completion_date` 的 `Some(None)`
/// 表示清除日期。
#[derive(Debug, Clone, Default)]
pub struct ListPatch {
    pub name: Option<String>,
    pub point_ids: Option<Vec<String>>,
    pub expected_completion_date: Option<Option<String>>,
    pub is_model: Option<bool>,
}

/// 台账服务：测点/清单 CRUD 与清单复制。
pub struct CatalogService {
    point_store: Arc<dyn PointStore>,
    list_store: Arc<dyn ListStore>,
}

impl CatalogService {
    /// 创建台账服务实例。
    pub fn new(point_store: Arc<dyn PointStore>, list_store: Arc<dyn ListStore>) -> Self {
        Self {
            point_store,
            list_store,
        }
    }

    /// 创建测点。
    pub async fn create_point(
        &self,
        ctx: &SessionContext,
        input: NewPoint,
    ) -> Result<ReadingPointRecord, CatalogError> {
        let name = normalize_required(input.name, "name")?;
        let building = normalize_required(input.building, "building")?;
        let floor = normalize_required(input.floor, "floor")?;
        let room = normalize_required(input.room, "room")?;
        let reading_type = normalize_required(input.reading_type, "readingType")?;
        let unit = normalize_required(input.unit, "unit")?;
        ensure_bounds(input.min_value, input.max_value)?;

        let record = ReadingPointRecord {
            point_id: Uuid::new_v4().to_string(),
            name,
            building,
            floor,
            room,
            reading_type,
            component: normalize_optional(input.component),
            unit,
            description: normalize_optional(input.description),
            validation_mode: input.validation_mode,
            min_value: input.min_value,
            max_value: input.max_value,
            active: true,
            created_at: Utc::now(),
        };
        let created = self
            .point_store
            .create_point(ctx, record)
            .await
            .map_err(|err| CatalogError::Storage(err.to_string()))?;
        info!(
            target: "rounds.catalog",
            point_id = %created.point_id,
            user = %ctx.user_id,
            "point_created"
        );
        Ok(created)
    }

    /// 部分更新测点；校验合并后的量程上下限。
    pub async fn update_point(
        &self,
        ctx: &SessionContext,
        point_id: &str,
        update: ReadingPointUpdate,
    ) -> Result<ReadingPointRecord, CatalogError> {
        let existing = self
            .point_store
            .find_point(ctx, point_id)
            .await
            .map_err(|err| CatalogError::Storage(err.to_string()))?
            .ok_or_else(|| CatalogError::PointNotFound(point_id.to_string()))?;
        let merged_min = update.min_value.or(existing.min_value);
        let merged_max = update.max_value.or(existing.max_value);
        ensure_bounds(merged_min, merged_max)?;

        self.point_store
            .update_point(ctx, point_id, update)
            .await
            .map_err(|err| CatalogError::Storage(err.to_string()))?
            .ok_or_else(|| CatalogError::PointNotFound(point_id.to_string()))
    }

    /// 删除测点（硬删除）。
    pub async fn delete_point(
        &self,
        ctx: &SessionContext,
        point_id: &str,
    ) -> Result<(), CatalogError> {
        let removed = self
            .point_store
            .delete_point(ctx, point_id)
            .await
            .map_err(|err| CatalogError::Storage(err.to_string()))?;
        if !removed {
            return Err(CatalogError::PointNotFound(point_id.to_string()));
        }
        info!(target: "rounds.catalog", point_id = %point_id, user = %ctx.user_id, "point_deleted");
        Ok(())
    }

    /// 创建清单。
    pub async fn create_list(
        &self,
        ctx: &SessionContext,
        input: NewList,
    ) -> Result<ReadingListRecord, CatalogError> {
        let name = normalize_required(input.name, "name")?;
        let expected = parse_optional_date(input.expected_completion_date)?;
        self.ensure_points_exist(ctx, &input.point_ids).await?;

        let now = Utc::now();
        let record = ReadingListRecord {
            list_id: Uuid::new_v4().to_string(),
            name,
            point_ids: input.point_ids,
            expected_completion_date: expected,
            created_by: ctx.user_id.clone(),
            created_at: now,
            updated_at: now,
            is_model: input.is_model,
        };
        let created = self
            .list_store
            .create_list(ctx, record)
            .await
            .map_err(|err| CatalogError::Storage(err.to_string()))?;
        info!(
            target: "rounds.catalog",
            list_id = %created.list_id,
            user = %ctx.user_id,
            is_model = created.is_model,
            "list_created"
        );
        Ok(created)
    }

    /// 部分更新清单。
    pub async fn update_list(
        &self,
        ctx: &SessionContext,
        list_id: &str,
        patch: ListPatch,
    ) -> Result<ReadingListRecord, CatalogError> {
        if let Some(point_ids) = &patch.point_ids {
            self.ensure_points_exist(ctx, point_ids).await?;
        }
        let expected = match patch.expected_completion_date {
            None => None,
            Some(None) => Some(None),
            Some(Some(raw)) => Some(Some(
                parse_calendar_date(&raw).map_err(|_| CatalogError::InvalidDate(raw))?,
            )),
        };
        let update = ReadingListUpdate {
            name: patch.name,
            point_ids: patch.point_ids,
            expected_completion_date: expected,
            is_model: patch.is_model,
        };
        self.list_store
            .update_list(ctx, list_id, update)
            .await
            .map_err(|err| CatalogError::Storage(err.to_string()))?
            .ok_or_else(|| CatalogError::ListNotFound(list_id.to_string()))
    }

    /// 删除清单。
    pub async fn delete_list(
        &self,
        ctx: &SessionContext,
        list_id: &str,
    ) -> Result<(), CatalogError> {
        let removed = self
            .list_store
            .delete_list(ctx, list_id)
            .await
            .map_err(|err| CatalogError::Storage(err.to_string()))?;
        if !removed {
            return Err(CatalogError::ListNotFound(list_id.to_string()));
        }
        Ok(())
    }

    /// 复制清单（模板或普通清单均可）。
    ///
    /// 副本获得全新 ID 与时间戳，预期完成日期重置为复制当日，
    /// 且总是可作业清单（is_model = false）。
    pub async fn copy_list(
        &self,
        ctx: &SessionContext,
        list_id: &str,
    ) -> Result<ReadingListRecord, CatalogError> {
        let source = self
            .list_store
            .find_list(ctx, list_id)
            .await
            .map_err(|err| CatalogError::Storage(err.to_string()))?
            .ok_or_else(|| CatalogError::ListNotFound(list_id.to_string()))?;

        let now = Utc::now();
        let copy = ReadingListRecord {
            list_id: Uuid::new_v4().to_string(),
            name: source.name.clone(),
            point_ids: source.point_ids.clone(),
            expected_completion_date: Some(now.date_naive()),
            created_by: ctx.user_id.clone(),
            created_at: now,
            updated_at: now,
            is_model: false,
        };
        let created = self
            .list_store
            .create_list(ctx, copy)
            .await
            .map_err(|err| CatalogError::Storage(err.to_string()))?;
        info!(
            target: "rounds.catalog",
            source_list_id = %list_id,
            list_id = %created.list_id,
            user = %ctx.user_id,
            "list_copied"
        );
        Ok(created)
    }

    /// 校验清单引用的测点全部存在。
    async fn ensure_points_exist(
        &self,
        ctx: &SessionContext,
        point_ids: &[String],
    ) -> Result<(), CatalogError> {
        for point_id in point_ids {
            let found = self
                .point_store
                .find_point(ctx, point_id)
                .await
                .map_err(|err| CatalogError::Storage(err.to_string()))?;
            if found.is_none() {
                return Err(CatalogError::PointNotFound(point_id.clone()));
            }
        }
        Ok(())
    }
}

fn normalize_required(value: String, field: &'static str) -> Result<String, CatalogError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_optional_date(raw: Option<String>) -> Result<Option<NaiveDate>, CatalogError> {
    match raw {
        None => Ok(None),
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            parse_calendar_date(trimmed)
                .map(Some)
                .map_err(|_| CatalogError::InvalidDate(trimmed.to_string()))
        }
    }
}

fn ensure_bounds(min: Option<f64>, max: Option<f64>) -> Result<(), CatalogError> {
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(CatalogError::InvertedBounds);
        }
    }
    Ok(())
}
