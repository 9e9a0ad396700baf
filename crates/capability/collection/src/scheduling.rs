//! 清单排期过滤：判定哪些清单当前可作业。
//!
//! 规则：
//! - 无预期完成日期的清单恒可用
//! - 预期完成日期 ≤ 今天（到期或逾期）的清单可用
//! - 未来日期的清单不可用，并给出人类可读的原因
//! - 模板清单（is_model）绝不进入待办选择器

use chrono::NaiveDate;
use domain::dates::format_calendar_date;
use rounds_storage::ReadingListRecord;
use std::collections::HashSet;

/// 清单可用性判定结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListAvailability {
    pub available: bool,
    pub reason: Option<String>,
}

impl ListAvailability {
    fn available() -> Self {
        Self {
            available: true,
            reason: None,
        }
    }

    fn unavailable(reason: String) -> Self {
        Self {
            available: false,
            reason: Some(reason),
        }
    }
}

/// 判定清单在给定日期是否可作业。
pub fn is_list_available(list: &ReadingListRecord, today: NaiveDate) -> ListAvailability {
    match list.expected_completion_date {
        None => ListAvailability::available(),
        Some(due) if due <= today => ListAvailability::available(),
        Some(due) => ListAvailability::unavailable(format!(
            "available on {}",
            format_calendar_date(due)
        )),
    }
}

/// 返回仍有未完成测点的可作业清单（驱动「还剩什么要做」选择器）。
pub fn incomplete_due_or_overdue_lists<'a>(
    lists: &'a [ReadingListRecord],
    completed_point_ids: &HashSet<String>,
    today: NaiveDate,
) -> Vec<&'a ReadingListRecord> {
    lists
        .iter()
        .filter(|list| !list.is_model)
        .filter(|list| is_list_available(list, today).available)
        .filter(|list| {
            list.point_ids
                .iter()
                .any(|point_id| !completed_point_ids.contains(point_id))
        })
        .collect()
}
