pub mod data;
pub mod dates;
pub mod roles;

pub use data::{ReadingValue, ReviewStatus, ValidationMode, SAT, UNSAT};
pub use roles::Role;

/// 会话上下文：身份协作方提供的用户标识与角色集合。
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub user_id: String,
    pub display_name: String,
    pub email: Option<String>,
    pub roles: Vec<Role>,
}

impl SessionContext {
    /// 构造显式身份与角色集合的会话上下文。
    pub fn new(
        user_id: impl Into<String>,
        display_name: impl Into<String>,
        email: Option<String>,
        roles: Vec<Role>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
            email,
            roles,
        }
    }

    /// 是否持有指定角色。
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// 是否可管理测点与清单台账。
    pub fn can_manage_catalog(&self) -> bool {
        roles::can_manage_catalog(&self.roles)
    }

    /// 是否可执行审核动作。
    pub fn can_review(&self) -> bool {
        roles::can_review(&self.roles)
    }

    /// 提交读数时是否免审直接入库。
    pub fn bypasses_review(&self) -> bool {
        roles::bypasses_review(&self.roles)
    }
}

impl Default for SessionContext {
    /// 空上下文（仅用于测试或占位）。
    fn default() -> Self {
        Self {
            user_id: "".to_string(),
            display_name: "".to_string(),
            email: None,
            roles: Vec::new(),
        }
    }
}
