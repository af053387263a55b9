// ==========================================
// 车队 TCO 分析系统 - 日志初始化
// ==========================================
// 输出: stderr (stdout 留给 CLI 的 JSON / CSV 结果)
// 格式: 文本 (默认) 或 JSON 行, 由 FLEET_TCO_LOG_FORMAT 选择
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 默认过滤器: info, perf 目标只保留慢操作告警
pub const DEFAULT_FILTER: &str = "info,perf=warn";

/// 日志格式环境变量
pub const LOG_FORMAT_ENV: &str = "FLEET_TCO_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    /// 未识别的取值按文本处理
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "json" => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// 初始化日志系统
///
/// - RUST_LOG 覆盖过滤器, 例如 `RUST_LOG=fleet_tco::engine=trace,perf=info`
/// - `FLEET_TCO_LOG_FORMAT=json` 输出 JSON 行, 便于日志采集
///
/// ```no_run
/// fleet_tco::logging::init();
/// ```
pub fn init() {
    let format = LogFormat::from_env_value(std::env::var(LOG_FORMAT_ENV).ok().as_deref());
    let builder = fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true);

    match format {
        LogFormat::Json => builder.json().with_current_span(false).init(),
        LogFormat::Text => builder.with_thread_ids(false).init(),
    }
}

/// 测试用: debug 级别写入测试输出, 可重复调用
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_env_value() {
        assert_eq!(LogFormat::from_env_value(Some("json")), LogFormat::Json);
        assert_eq!(LogFormat::from_env_value(Some(" JSON ")), LogFormat::Json);
        assert_eq!(LogFormat::from_env_value(Some("pretty")), LogFormat::Text);
        assert_eq!(LogFormat::from_env_value(None), LogFormat::Text);
    }
}
