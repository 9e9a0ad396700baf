use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// 合格评定的字面量（必须与存量数据逐字一致）。
pub const SAT: &str = "SAT";
/// 不合格评定的字面量。
pub const UNSAT: &str = "UNSAT";

/// 读数值：有限数值，或 SAT/UNSAT 评定。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReadingValue {
    Number(f64),
    Sat,
    Unsat,
}

impl ReadingValue {
    /// 按输入原文解析读数值。
    ///
    /// 只接受逐字的 SAT/UNSAT，或可解析的有限数值；其余返回 None。
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            SAT => Some(Self::Sat),
            UNSAT => Some(Self::Unsat),
            other => {
                let value = other.parse::<f64>().ok()?;
                value.is_finite().then_some(Self::Number(value))
            }
        }
    }

    /// 数值形式（评定值返回 None）。
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// 是否为 UNSAT 评定。
    pub fn is_unsat(&self) -> bool {
        matches!(self, Self::Unsat)
    }
}

impl fmt::Display for ReadingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{}", value),
            Self::Sat => f.write_str(SAT),
            Self::Unsat => f.write_str(UNSAT),
        }
    }
}

// JSON 编码：数值写作 number，评定写作 "SAT"/"UNSAT" 字符串。
impl Serialize for ReadingValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Number(value) => serializer.serialize_f64(*value),
            Self::Sat => serializer.serialize_str(SAT),
            Self::Unsat => serializer.serialize_str(UNSAT),
        }
    }
}

struct ReadingValueVisitor;

impl<'de> Visitor<'de> for ReadingValueVisitor {
    type Value = ReadingValue;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a finite number or the string \"SAT\"/\"UNSAT\"")
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        if value.is_finite() {
            Ok(ReadingValue::Number(value))
        } else {
            Err(E::custom("non-finite reading value"))
        }
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(ReadingValue::Number(value as f64))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(ReadingValue::Number(value as f64))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        match value {
            SAT => Ok(ReadingValue::Sat),
            UNSAT => Ok(ReadingValue::Unsat),
            other => Err(E::custom(format!("unknown reading value: {}", other))),
        }
    }
}

impl<'de> Deserialize<'de> for ReadingValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ReadingValueVisitor)
    }
}

/// 测点的校验模式：数值量程或 SAT/UNSAT 评定。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    Range,
    SatUnsat,
}

/// 提交单审核状态。
///
/// `Pending` 是唯一非终态；进入任一终态后不再发生转移。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
    NeedsRevision,
}

impl ReviewStatus {
    /// 是否已离开待审状态。
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// 状态的持久化字面量。
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::NeedsRevision => "needs_revision",
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
