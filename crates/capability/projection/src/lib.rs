//! 查询投影能力：读数仓储之上的过滤与排序视图。
//!
//! 过滤条件互相独立、全部按 AND 组合；构件条件通过读数的
//! 测点引用联查测点的构件字段，没有测点引用的读数无条件
//! 通过构件过滤。排序只作用于返回的视图，不改动仓储内的
//! 插入序。

use chrono::NaiveDate;
use domain::dates::date_of;
use domain::SessionContext;
use rounds_storage::{BuildingReadingRecord, PointStore, ReadingStore, TimeOrder};
use std::collections::HashMap;
use std::sync::Arc;

/// 投影错误。
#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    #[error("storage error: {0}")]
    Storage(String),
}

/// 读数过滤条件；None 的条件不参与过滤。
#[derive(Debug, Clone, Default)]
pub struct ReadingFilter {
    pub reading_type: Option<String>,
    pub building: Option<String>,
    pub room: Option<String>,
    pub component: Option<String>,
    /// 按 UTC 时间戳的日期部分做日期级比较
    pub date: Option<NaiveDate>,
}

/// 读数投影：表格与图表消费的只读视图。
pub struct ReadingProjection {
    reading_store: Arc<dyn ReadingStore>,
    point_store: Arc<dyn PointStore>,
}

impl ReadingProjection {
    /// 创建投影实例。
    pub fn new(reading_store: Arc<dyn ReadingStore>, point_store: Arc<dyn PointStore>) -> Self {
        Self {
            reading_store,
            point_store,
        }
    }

    /// 表格默认视图：时间倒序（最新在前）。
    pub async fn latest_first(
        &self,
        ctx: &SessionContext,
        filter: &ReadingFilter,
    ) -> Result<Vec<BuildingReadingRecord>, ProjectionError> {
        self.query(ctx, filter, TimeOrder::Desc).await
    }

    /// 过滤并按指定方向排序。
    pub async fn query(
        &self,
        ctx: &SessionContext,
        filter: &ReadingFilter,
        order: TimeOrder,
    ) -> Result<Vec<BuildingReadingRecord>, ProjectionError> {
        let readings = self
            .reading_store
            .list_readings(ctx)
            .await
            .map_err(|err| ProjectionError::Storage(err.to_string()))?;

        // 仅在按构件过滤时联查测点表
        let components: HashMap<String, Option<String>> = if filter.component.is_some() {
            self.point_store
                .list_points(ctx)
                .await
                .map_err(|err| ProjectionError::Storage(err.to_string()))?
                .into_iter()
                .map(|point| (point.point_id, point.component))
                .collect()
        } else {
            HashMap::new()
        };

        let mut items: Vec<BuildingReadingRecord> = readings
            .into_iter()
            .filter(|reading| matches(reading, filter, &components))
            .collect();

        items.sort_by_key(|item| item.recorded_at);
        if matches!(order, TimeOrder::Desc) {
            items.reverse();
        }
        Ok(items)
    }
}

fn matches(
    reading: &BuildingReadingRecord,
    filter: &ReadingFilter,
    components: &HashMap<String, Option<String>>,
) -> bool {
    if let Some(reading_type) = &filter.reading_type {
        if &reading.reading_type != reading_type {
            return false;
        }
    }
    if let Some(building) = &filter.building {
        if &reading.building != building {
            return false;
        }
    }
    if let Some(room) = &filter.room {
        if &reading.room != room {
            return false;
        }
    }
    if let Some(component) = &filter.component {
        match &reading.point_id {
            // 没有测点引用的读数无条件通过构件过滤
            None => {}
            Some(point_id) => {
                let matched = components
                    .get(point_id)
                    .and_then(|value| value.as_deref())
                    .map_or(false, |value| value == component);
                if !matched {
                    return false;
                }
            }
        }
    }
    if let Some(date) = &filter.date {
        if &date_of(&reading.recorded_at) != date {
            return false;
        }
    }
    true
}
