// ==========================================
// 车队 TCO 分析系统 - 领域模型层
// ==========================================
// 职责: 定义分析输入记录、输出记录与闭合枚举
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod component;
pub mod fleet;
pub mod pm_task;
pub mod price;
pub mod result;
pub mod scenario;
pub mod snapshot;
pub mod types;

// 重导出核心类型
pub use component::{ComponentLifecycle, DEFAULT_WEIBULL_SHAPE};
pub use fleet::{EquipmentModel, FleetUnit, FuelProfile};
pub use pm_task::{PmTask, TaskPart};
pub use price::{PriceCatalog, PriceListItem};
pub use result::{
    AnalysisResult, AnalysisWarning, ComparisonEntry, ComparisonResult, ComponentReliability,
    CostCategoryRow, CurvePoint, DowntimeSummary, DueReplacement, FailureCurve, FuelDetailRow,
    FuelSummary, LowestTco, MetricWinner, Projection, ProjectionRow, ProjectionSummary,
    RankedScenario, ReliabilityScheduleYear, ReplacementEvent, ReplacementInterval, ReplacementSchedule,
    ScenarioFailure, StaffingRampRow, StaffingSummary, TaskCostRow, TaskCostSummary,
    WeibullParameters,
};
pub use scenario::{LaborRates, ResolvedScenario, Scenario};
pub use snapshot::AnalysisSnapshot;
pub use types::{
    ComparisonMetric, CostCategory, FuelUnit, LoadTier, RecurrenceKind, ReplacementBasis,
    SkillTier, TaskStatus, UnknownComparisonMetric, UnknownSkillTier,
};
