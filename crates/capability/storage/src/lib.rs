//! # Rounds Storage 模块
//!
//! 本模块提供统一的数据存储抽象层。
//!
//! ## 架构设计
//!
//! 1. **接口抽象层** (`traits.rs`)：定义所有资源存储的异步 Trait 接口
//! 2. **数据模型层** (`models.rs`)：定义存储相关的数据结构
//! 3. **错误处理层** (`error.rs`)：统一的存储错误类型
//! 4. **验证辅助层** (`validation.rs`)：会话身份与角色门禁验证
//! 5. **持久化协作方** (`kv.rs` / `snapshot.rs`)：键值字节存储与
//!    整集合 JSON 快照（容忍缺失与损坏，降级为空集合）
//! 6. **实现层** (`in_memory/`)：内存仓储实现，可选挂接快照写穿
//!
//! ## 设计约束
//!
//! - 所有数据访问方法必须显式接收 `SessionContext`
//! - 台账变更需要管理员角色；审核操作需要审核角色
//! - 已入库读数不可更新，只能删除（无级联效应）
//! - 快照读写失败只记录日志与计数，绝不向调用方传播

pub mod error;
pub mod in_memory;
pub mod kv;
pub mod models;
pub mod snapshot;
pub mod traits;
pub mod validation;

pub use error::*;
pub use kv::{BlobStore, FileBlobStore, InMemoryBlobStore};
pub use models::*;
pub use snapshot::{keys, SnapshotSink};
pub use traits::*;
pub use validation::*;

pub use in_memory::{
    InMemoryListStore, InMemoryPointStore, InMemoryReadingStore, InMemorySubmissionStore,
    InMemoryUserStore,
};
