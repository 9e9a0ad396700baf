//! 采集会话能力：完成状态跟踪与清单排期过滤。

pub mod scheduling;
pub mod session;

pub use scheduling::{incomplete_due_or_overdue_lists, is_list_available, ListAvailability};
pub use session::{CollectionError, CollectionSession, PointCompletion, PointEntry};
