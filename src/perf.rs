use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

static SLOW_OP_THRESHOLD_MS: OnceLock<AtomicU64> = OnceLock::new();

thread_local! {
    static PERF_DEPTH: Cell<u32> = const { Cell::new(0) };
}

/// 慢操作阈值（毫秒）
///
/// - `FLEET_TCO_SLOW_OP_MS=500` 覆盖默认值
/// - Debug 默认 1000；Release 默认 5000
fn slow_threshold_ms() -> u64 {
    SLOW_OP_THRESHOLD_MS
        .get_or_init(|| {
            let ms = std::env::var("FLEET_TCO_SLOW_OP_MS")
                .ok()
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(if cfg!(debug_assertions) { 1_000 } else { 5_000 });
            AtomicU64::new(ms)
        })
        .load(Ordering::Relaxed)
}

/// 性能统计 Guard：记录 elapsed_ms + 嵌套深度，超过阈值时输出 warn
///
/// 使用方式：
/// ```ignore
/// let _perf = fleet_tco::perf::PerfGuard::new("analysis.run");
/// // do work...
/// ```
pub struct PerfGuard {
    op: &'static str,
    detail: Option<String>,
    start: Instant,
    depth: u32,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        let depth = PERF_DEPTH.with(|d| {
            let next = d.get().saturating_add(1);
            d.set(next);
            next
        });
        Self {
            op,
            detail: None,
            start: Instant::now(),
            depth,
        }
    }

    /// 附带业务标识（如 scenario_id）
    pub fn with_detail(op: &'static str, detail: impl Into<String>) -> Self {
        let mut guard = Self::new(op);
        guard.detail = Some(detail.into());
        guard
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_millis() as u64;
        let detail = self.detail.as_deref().unwrap_or("");

        if elapsed_ms >= slow_threshold_ms() {
            tracing::warn!(
                target: "perf",
                op = self.op,
                detail,
                elapsed_ms,
                depth = self.depth,
                "slow op"
            );
        } else {
            tracing::info!(
                target: "perf",
                op = self.op,
                detail,
                elapsed_ms,
                depth = self.depth,
                "done"
            );
        }

        PERF_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_guards_track_depth() {
        let outer = PerfGuard::new("outer");
        {
            let inner = PerfGuard::with_detail("inner", "S1");
            assert_eq!(inner.depth, outer.depth + 1);
            assert_eq!(inner.detail.as_deref(), Some("S1"));
        }
        let sibling = PerfGuard::new("sibling");
        assert_eq!(sibling.depth, outer.depth + 1);
    }
}
