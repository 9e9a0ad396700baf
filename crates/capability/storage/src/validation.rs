//! 验证辅助函数
//!
//! 提供统一的验证逻辑，确保数据一致性：
//! - ensure_identified：验证会话带有非空用户标识
//! - ensure_catalog_admin：验证台账管理角色
//! - ensure_reviewer：验证审核角色
//!
//! 使用场景：
//! - 所有数据访问前验证会话上下文
//! - 台账变更与审核操作前验证角色门禁

use crate::error::StorageError;
use domain::SessionContext;

/// 验证会话带有非空用户标识
pub fn ensure_identified(ctx: &SessionContext) -> Result<(), StorageError> {
    if ctx.user_id.is_empty() {
        return Err(StorageError::new("user context required"));
    }
    Ok(())
}

/// 验证台账管理角色
///
/// 测点与清单的变更只开放给管理员级角色。
pub fn ensure_catalog_admin(ctx: &SessionContext) -> Result<(), StorageError> {
    ensure_identified(ctx)?;
    if !ctx.can_manage_catalog() {
        return Err(StorageError::new("catalog admin role required"));
    }
    Ok(())
}

/// 验证审核角色
pub fn ensure_reviewer(ctx: &SessionContext) -> Result<(), StorageError> {
    ensure_identified(ctx)?;
    if !ctx.can_review() {
        return Err(StorageError::new("reviewer role required"));
    }
    Ok(())
}
