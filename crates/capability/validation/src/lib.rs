//! 读数校验能力：判定录入值是否可接受、是否必须附备注。
//!
//! 判定函数都是纯谓词，不抛错误：无法解析的输入一律得到
//! false，由录入界面保持在不可完成状态。
//!
//! 规则汇总：
//! - SAT/UNSAT 模式：只接受逐字的 "SAT"/"UNSAT"；UNSAT 必须附非空备注
//! - 量程模式：必须解析为有限数值，且不等于占位哨兵 0；
//!   越程数值仍可录入，但完成前必须附非空备注
//! - 上下限均缺省时，任何有限数值都视为在程

use domain::{ReadingValue, ValidationMode, SAT, UNSAT};
use rounds_storage::ReadingPointRecord;

/// 按测点校验模式解析录入原文。
///
/// 量程测点只接受数值，评定测点只接受字面量；两类都解析
/// 失败时返回 None。
pub fn parse_value(point: &ReadingPointRecord, raw: &str) -> Option<ReadingValue> {
    match point.validation_mode {
        ValidationMode::SatUnsat => match raw.trim() {
            SAT => Some(ReadingValue::Sat),
            UNSAT => Some(ReadingValue::Unsat),
            _ => None,
        },
        ValidationMode::Range => {
            let value = raw.trim().parse::<f64>().ok()?;
            // 0 是来源数据中的「未填写」哨兵，不视为有效读数
            (value.is_finite() && value != 0.0).then_some(ReadingValue::Number(value))
        }
    }
}

/// 录入值是否可接受。
pub fn is_value_valid(point: &ReadingPointRecord, raw: &str) -> bool {
    parse_value(point, raw).is_some()
}

/// 数值是否落在测点量程内。
///
/// 缺省的一侧按无界处理；评定值没有量程概念，恒为在程。
pub fn is_in_range(point: &ReadingPointRecord, raw: &str) -> bool {
    match parse_value(point, raw) {
        Some(ReadingValue::Number(value)) => {
            let min_ok = point.min_value.map_or(true, |min| value >= min);
            let max_ok = point.max_value.map_or(true, |max| value <= max);
            min_ok && max_ok
        }
        Some(_) => true,
        None => false,
    }
}

/// 该录入值完成前是否必须附备注。
///
/// UNSAT 一律要求备注；越程数值要求备注；其余不要求。
pub fn requires_comment(point: &ReadingPointRecord, raw: &str) -> bool {
    match parse_value(point, raw) {
        Some(ReadingValue::Unsat) => true,
        Some(ReadingValue::Number(_)) => !is_in_range(point, raw),
        _ => false,
    }
}

/// 备注是否已实际填写（非空且非纯空白）。
pub fn comment_provided(notes: Option<&str>) -> bool {
    notes.map_or(false, |notes| !notes.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn range_point(min: Option<f64>, max: Option<f64>) -> ReadingPointRecord {
        ReadingPointRecord {
            point_id: "point-1".to_string(),
            name: "Supply temp".to_string(),
            building: "B1".to_string(),
            floor: "2".to_string(),
            room: "201".to_string(),
            reading_type: "temperature".to_string(),
            component: None,
            unit: "C".to_string(),
            description: None,
            validation_mode: ValidationMode::Range,
            min_value: min,
            max_value: max,
            active: true,
            created_at: Utc::now(),
        }
    }

    fn sat_point() -> ReadingPointRecord {
        let mut point = range_point(None, None);
        point.validation_mode = ValidationMode::SatUnsat;
        point.min_value = None;
        point.max_value = None;
        point
    }

    #[test]
    fn range_values_must_be_finite_nonzero_numbers() {
        let point = range_point(Some(10.0), Some(20.0));
        assert!(is_value_valid(&point, "15"));
        assert!(is_value_valid(&point, "25"));
        assert!(!is_value_valid(&point, "0"));
        assert!(!is_value_valid(&point, "abc"));
        assert!(!is_value_valid(&point, "NaN"));
        assert!(!is_value_valid(&point, "SAT"));
    }

    #[test]
    fn range_bounds_treat_missing_side_as_unbounded() {
        let bounded = range_point(Some(10.0), Some(20.0));
        assert!(is_in_range(&bounded, "10"));
        assert!(is_in_range(&bounded, "20"));
        assert!(!is_in_range(&bounded, "9.9"));
        assert!(!is_in_range(&bounded, "20.1"));

        let min_only = range_point(Some(10.0), None);
        assert!(is_in_range(&min_only, "1000000"));
        assert!(!is_in_range(&min_only, "9"));

        let unbounded = range_point(None, None);
        assert!(is_in_range(&unbounded, "-273.15"));
    }

    #[test]
    fn out_of_range_values_stay_valid_but_need_comments() {
        let point = range_point(Some(10.0), Some(20.0));
        assert!(is_value_valid(&point, "25"));
        assert!(!is_in_range(&point, "25"));
        assert!(requires_comment(&point, "25"));
        assert!(!requires_comment(&point, "15"));
    }

    #[test]
    fn sat_unsat_accepts_exact_literals_only() {
        let point = sat_point();
        assert!(is_value_valid(&point, "SAT"));
        assert!(is_value_valid(&point, "UNSAT"));
        assert!(!is_value_valid(&point, "sat"));
        assert!(!is_value_valid(&point, "OK"));
        assert!(!is_value_valid(&point, "1"));
        assert!(requires_comment(&point, "UNSAT"));
        assert!(!requires_comment(&point, "SAT"));
    }

    #[test]
    fn comment_provided_ignores_whitespace() {
        assert!(!comment_provided(None));
        assert!(!comment_provided(Some("")));
        assert!(!comment_provided(Some("   \t")));
        assert!(comment_provided(Some("spike due to maintenance")));
    }
}
