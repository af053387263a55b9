// ==========================================
// 车队 TCO 分析系统 - 引擎层
// ==========================================
// 职责: 纯计算引擎, 输入已解析方案, 输出结果记录
// 红线: Engine 不访问存储, 无共享可变状态
// ==========================================

pub mod comparison;
pub mod downtime;
pub mod error;
pub mod fuel;
pub mod orchestrator;
pub mod projection;
pub mod reliability;
pub mod replacement;
pub mod staffing;
pub mod task_cost;
pub mod validation;

// 重导出核心引擎
pub use comparison::ComparisonEngine;
pub use downtime::DowntimeEstimator;
pub use error::{EngineError, EngineResult};
pub use fuel::FuelCostEstimator;
pub use orchestrator::AnalysisOrchestrator;
pub use projection::{ProjectionEngine, ProjectionInputs};
pub use reliability::{gamma, ReliabilityModel, WeibullDistribution};
pub use replacement::ComponentReplacementScheduler;
pub use staffing::StaffingPlanner;
pub use task_cost::TaskCostEngine;
pub use validation::ScenarioValidator;
