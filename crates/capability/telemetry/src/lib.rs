//! 日志初始化与流程计数。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use tracing_subscriber::{fmt, EnvFilter};

/// 基础指标快照。
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub values_rejected: u64,
    pub completions_marked: u64,
    pub completions_reverted: u64,
    pub readings_committed: u64,
    pub readings_removed: u64,
    pub submissions_created: u64,
    pub submissions_approved: u64,
    pub submissions_rejected: u64,
    pub revisions_requested: u64,
    pub notify_failures: u64,
    pub snapshot_load_failures: u64,
    pub snapshot_save_failures: u64,
}

/// 基础指标。
pub struct TelemetryMetrics {
    values_rejected: AtomicU64,
    completions_marked: AtomicU64,
    completions_reverted: AtomicU64,
    readings_committed: AtomicU64,
    readings_removed: AtomicU64,
    submissions_created: AtomicU64,
    submissions_approved: AtomicU64,
    submissions_rejected: AtomicU64,
    revisions_requested: AtomicU64,
    notify_failures: AtomicU64,
    snapshot_load_failures: AtomicU64,
    snapshot_save_failures: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            values_rejected: AtomicU64::new(0),
            completions_marked: AtomicU64::new(0),
            completions_reverted: AtomicU64::new(0),
            readings_committed: AtomicU64::new(0),
            readings_removed: AtomicU64::new(0),
            submissions_created: AtomicU64::new(0),
            submissions_approved: AtomicU64::new(0),
            submissions_rejected: AtomicU64::new(0),
            revisions_requested: AtomicU64::new(0),
            notify_failures: AtomicU64::new(0),
            snapshot_load_failures: AtomicU64::new(0),
            snapshot_save_failures: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            values_rejected: self.values_rejected.load(Ordering::Relaxed),
            completions_marked: self.completions_marked.load(Ordering::Relaxed),
            completions_reverted: self.completions_reverted.load(Ordering::Relaxed),
            readings_committed: self.readings_committed.load(Ordering::Relaxed),
            readings_removed: self.readings_removed.load(Ordering::Relaxed),
            submissions_created: self.submissions_created.load(Ordering::Relaxed),
            submissions_approved: self.submissions_approved.load(Ordering::Relaxed),
            submissions_rejected: self.submissions_rejected.load(Ordering::Relaxed),
            revisions_requested: self.revisions_requested.load(Ordering::Relaxed),
            notify_failures: self.notify_failures.load(Ordering::Relaxed),
            snapshot_load_failures: self.snapshot_load_failures.load(Ordering::Relaxed),
            snapshot_save_failures: self.snapshot_save_failures.load(Ordering::Relaxed),
        }
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局指标实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 记录录入值被校验拒绝的次数。
pub fn record_value_rejected() {
    metrics().values_rejected.fetch_add(1, Ordering::Relaxed);
}

/// 记录测点标记完成次数。
pub fn record_completion_marked() {
    metrics().completions_marked.fetch_add(1, Ordering::Relaxed);
}

/// 记录完成标记撤销次数。
pub fn record_completion_reverted() {
    metrics()
        .completions_reverted
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录入库读数条数。
pub fn record_readings_committed(count: u64) {
    metrics()
        .readings_committed
        .fetch_add(count, Ordering::Relaxed);
}

/// 记录删除读数次数。
pub fn record_reading_removed() {
    metrics().readings_removed.fetch_add(1, Ordering::Relaxed);
}

/// 记录创建待审提交单次数。
pub fn record_submission_created() {
    metrics()
        .submissions_created
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录审批通过次数。
pub fn record_submission_approved() {
    metrics()
        .submissions_approved
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录审批驳回次数。
pub fn record_submission_rejected() {
    metrics()
        .submissions_rejected
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录要求返工次数。
pub fn record_revision_requested() {
    metrics()
        .revisions_requested
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录通知投递失败次数（不影响已提交的状态转移）。
pub fn record_notify_failure() {
    metrics().notify_failures.fetch_add(1, Ordering::Relaxed);
}

/// 记录快照加载降级次数。
pub fn record_snapshot_load_failure() {
    metrics()
        .snapshot_load_failures
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录快照保存失败次数。
pub fn record_snapshot_save_failure() {
    metrics()
        .snapshot_save_failures
        .fetch_add(1, Ordering::Relaxed);
}
