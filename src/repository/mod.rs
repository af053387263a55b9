// ==========================================
// 车队 TCO 分析系统 - 数据访问边界
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 方案解析 (ScenarioSource) + 分析快照持久化
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod scenario_source;
pub mod snapshot_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use scenario_source::{InMemoryScenarioSource, ScenarioSource};
pub use snapshot_repo::AnalysisSnapshotRepository;
