//! 日历日期解析与日期级比较。
//!
//! 预期完成日期只有日期、没有时刻。来源系统依赖 `YYYY-MM-DD`
//! 字符串的字典序比较；此处改为真实日期类型，并在入口处拒绝
//! 畸形日期字符串，而不是任其错误比较。

use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;

/// 预期完成日期的唯一合法格式。
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 日历日期解析错误。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParseError {
    raw: String,
}

impl DateParseError {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }
}

impl fmt::Display for DateParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid calendar date: {}", self.raw)
    }
}

impl std::error::Error for DateParseError {}

/// 严格按 `YYYY-MM-DD` 解析日历日期。
///
/// chrono 对数字段的零填充是宽松的，这里要求输入与规范格式
/// 逐字一致，杜绝 `2026-8-6` 这类会破坏排序假设的写法。
pub fn parse_calendar_date(raw: &str) -> Result<NaiveDate, DateParseError> {
    let trimmed = raw.trim();
    let date = NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| DateParseError::new(trimmed))?;
    if format_calendar_date(date) != trimmed {
        return Err(DateParseError::new(trimmed));
    }
    Ok(date)
}

/// 日历日期的显示字符串（零填充 `YYYY-MM-DD`）。
pub fn format_calendar_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// 时间戳的日期部分（UTC），用于日期级过滤。
pub fn date_of(timestamp: &DateTime<Utc>) -> NaiveDate {
    timestamp.date_naive()
}
