//! 角色集合与角色策略。
//!
//! 角色是封闭集合：user / admin / reviewer / superadmin。
//! 策略函数集中在此，各能力层不得自行散布角色判断。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 系统角色（封闭枚举）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
    Reviewer,
    SuperAdmin,
}

impl Role {
    /// 按持久化字面量解析角色；未知字面量返回 None。
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "user" => Some(Self::User),
            "admin" => Some(Self::Admin),
            "reviewer" => Some(Self::Reviewer),
            "superadmin" => Some(Self::SuperAdmin),
            _ => None,
        }
    }

    /// 角色的持久化字面量。
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::Reviewer => "reviewer",
            Self::SuperAdmin => "superadmin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 可管理测点与清单台账的角色。
pub fn can_manage_catalog(roles: &[Role]) -> bool {
    roles
        .iter()
        .any(|role| matches!(role, Role::Admin | Role::SuperAdmin))
}

/// 可执行审核动作的角色。
pub fn can_review(roles: &[Role]) -> bool {
    roles
        .iter()
        .any(|role| matches!(role, Role::Reviewer | Role::SuperAdmin))
}

/// 提交读数免审直接入库的角色；其余提交一律送审。
pub fn bypasses_review(roles: &[Role]) -> bool {
    roles
        .iter()
        .any(|role| matches!(role, Role::Admin | Role::SuperAdmin))
}

/// 提交单创建后应收到通知的审核方角色。
pub fn reviewer_notification_roles() -> Vec<Role> {
    vec![Role::Reviewer, Role::SuperAdmin]
}
