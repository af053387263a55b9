// ==========================================
// 车队 TCO 分析系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite + tokio
// 系统定位: 确定性的成本与可靠性估算 (非故障仿真, 非调度)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 输入/输出记录与闭合枚举
pub mod domain;

// 数据访问边界 - 方案解析与快照持久化
pub mod repository;

// 引擎层 - 纯计算
pub mod engine;

// 配置层 - 引擎参数
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// CSV 导出
pub mod export;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    ComparisonMetric, CostCategory, FuelUnit, RecurrenceKind, ReplacementBasis, SkillTier,
    TaskStatus,
};

// 领域实体
pub use domain::{
    AnalysisResult, AnalysisSnapshot, ComparisonResult, ComponentLifecycle, FleetUnit, PmTask,
    PriceCatalog, ResolvedScenario, Scenario,
};

// 引擎
pub use engine::{
    AnalysisOrchestrator, ComparisonEngine, ComponentReplacementScheduler, EngineError,
    FuelCostEstimator, ProjectionEngine, ReliabilityModel, StaffingPlanner, TaskCostEngine,
};

// 配置
pub use config::{ConfigManager, EngineConfig};

// API
pub use api::{AnalysisApi, ApiError};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "车队 TCO 分析系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
