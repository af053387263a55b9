// ==========================================
// 车队 TCO 分析系统 - 分析结果模型
// ==========================================
// 职责: 引擎输出的纯值记录, 交由存储边界做快照持久化
// 红线: 不含时间戳/随机ID, 同一输入必须得到完全相同的输出
// ==========================================

use crate::domain::types::{
    ComparisonMetric, CostCategory, FuelUnit, LoadTier, RecurrenceKind, SkillTier, TaskStatus,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// 可靠性模型输出
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeibullParameters {
    pub shape: f64,
    pub scale: f64,
    pub mean_life_hours: f64,
    pub b10_life_hours: f64,
    pub b50_life_hours: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub hours: f64,
    pub failure_probability: f64,
    pub reliability: f64,
    pub failure_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureCurve {
    pub curve: Vec<CurvePoint>,
    pub parameters: WeibullParameters,
}

/// 最优更换间隔 (启发式近似, 仅作方向性参考)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplacementInterval {
    pub optimal_interval_hours: f64,
    pub cost_per_hour: f64,
    pub pct_of_oem_life: f64,
    pub is_heuristic: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentReliability {
    pub component_id: String,
    pub component_name: String,
    pub equipment_model_id: String,
    pub parameters: WeibullParameters,
    pub planned_cost: f64,
    pub replacement_interval: ReplacementInterval,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DueReplacement {
    pub component_id: String,
    pub component_name: String,
    /// 截至当年的累计更换序号
    pub replacement_number: u32,
    pub events_in_year: u32,
    pub units: u32,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReliabilityScheduleYear {
    pub year: u32,
    pub cumulative_hours: f64,
    pub replacements: Vec<DueReplacement>,
    pub total_cost: f64,
}

// ==========================================
// 维护任务成本输出
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskCostRow {
    pub task_id: String,
    pub name: String,
    pub status: TaskStatus,
    pub recurrence: RecurrenceKind,
    pub skill_tier: SkillTier,
    pub services_per_year: f64,
    pub labor_hours_per_year: f64,
    pub labor_cost_per_year: f64,
    pub parts_cost_per_year: f64,
    pub total_cost_per_year: f64,
    pub labor_hours_pct: f64,
}

impl TaskCostRow {
    pub fn is_one_time(&self) -> bool {
        self.recurrence == RecurrenceKind::OneTime
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskCostSummary {
    pub rows: Vec<TaskCostRow>,
    pub total_labor_hours: f64,
    pub total_labor_cost: f64,
    pub total_parts_cost: f64,
    pub overhead_cost: f64,
    /// labor + parts + overhead
    pub total_cost: f64,
    /// 一次性任务的人工+备件 (不含管理费)
    pub one_time_subtotal: f64,
    pub one_time_labor_hours: f64,
    pub unpriced_parts: Vec<String>,
}

impl TaskCostSummary {
    /// 一次性任务含管理费成本
    pub fn one_time_cost_with_overhead(&self, overhead_fraction: f64) -> f64 {
        self.one_time_subtotal * (1.0 + overhead_fraction)
    }
}

// ==========================================
// 人员配置输出
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaffingRampRow {
    pub month: u32,
    pub units_active: f64,
    pub deployment_fraction: f64,
    pub technicians_needed: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffingSummary {
    pub available_hours_per_tech: f64,
    pub safety_factor: f64,
    pub total_annual_labor_hours: f64,
    pub recurring_labor_hours: f64,
    /// 首年 (含一次性任务) 需求
    pub technicians_needed: u32,
    /// 稳态 (仅周期性任务) 需求
    pub steady_state_technicians: u32,
    pub utilization: f64,
    pub ramp: Vec<StaffingRampRow>,
}

// ==========================================
// 燃料/停机输出
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelDetailRow {
    pub fleet_unit_id: String,
    pub model_name: String,
    pub quantity: u32,
    pub annual_hours: f64,
    pub duty_cycle: f64,
    pub load_tier: LoadTier,
    pub unit: FuelUnit,
    pub consumption_rate: f64,
    /// 折算到计价单位后的每小时消耗
    pub normalized_rate: f64,
    pub annual_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelSummary {
    pub enabled: bool,
    pub rows: Vec<FuelDetailRow>,
    /// 无燃料档位数据的机组组
    pub missing_profiles: Vec<String>,
    pub total_annual_cost: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DowntimeSummary {
    pub enabled: bool,
    pub annual_downtime_hours: f64,
    pub cost_per_hour: f64,
    pub total_annual_cost: f64,
}

// ==========================================
// 部件更换计划输出
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplacementEvent {
    pub component_id: String,
    pub component_name: String,
    pub fleet_unit_id: String,
    pub replacement_number: u32,
    pub year: u32,
    pub units: u32,
    /// 单台单次未通胀成本
    pub unit_cost: f64,
    /// 全部台数通胀后成本
    pub inflated_cost: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplacementSchedule {
    pub events: Vec<ReplacementEvent>,
    pub cost_by_year: BTreeMap<u32, f64>,
    pub total_over_period: f64,
    pub unpriced_parts: Vec<String>,
}

impl ReplacementSchedule {
    pub fn cost_in_year(&self, year: u32) -> f64 {
        self.cost_by_year.get(&year).copied().unwrap_or(0.0)
    }
}

// ==========================================
// 年度预测输出
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRow {
    pub year: u32,
    pub inflation_multiplier: f64,
    pub maintenance_cost: f64,
    pub fuel_cost: f64,
    pub downtime_cost: f64,
    /// 第2年起扣除的一次性任务成本 (<=0)
    pub one_time_adjustment: f64,
    pub replacement_cost: f64,
    pub total_cost: f64,
    pub cumulative_nominal: f64,
    pub discount_factor: f64,
    pub discounted_cost: f64,
    pub cumulative_npv: f64,
    pub technicians: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub analysis_period_years: u32,
    pub total_units: u32,
    pub total_kw: f64,
    pub avg_annual_hours: f64,
    pub total_annual_operating_hours: f64,
    pub annual_maintenance_cost: f64,
    pub annual_fuel_cost: f64,
    pub annual_downtime_cost: f64,
    pub annual_total_cost: f64,
    pub total_nominal: f64,
    pub total_npv: f64,
    pub avg_annual_nominal: f64,
    pub avg_annual_npv: f64,
    pub cost_per_kwh: f64,
    pub cost_per_operating_hour: f64,
    pub technicians_needed: u32,
    pub technician_utilization: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub rows: Vec<ProjectionRow>,
    pub summary: ProjectionSummary,
}

// ==========================================
// 汇总结果
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostCategoryRow {
    pub category: CostCategory,
    pub annual_cost: f64,
    pub pct_of_total: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisWarning {
    pub code: String,
    pub component_id: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub scenario_id: String,
    pub scenario_name: String,
    pub summary: ProjectionSummary,
    pub task_costs: TaskCostSummary,
    pub cost_categories: Vec<CostCategoryRow>,
    pub projection: Vec<ProjectionRow>,
    pub staffing: StaffingSummary,
    pub fuel: FuelSummary,
    pub downtime: DowntimeSummary,
    pub replacements: ReplacementSchedule,
    pub reliability: Vec<ComponentReliability>,
    pub unpriced_parts: Vec<String>,
    pub warnings: Vec<AnalysisWarning>,
}

// ==========================================
// 多方案对比输出
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonEntry {
    pub scenario_id: String,
    pub scenario_name: String,
    pub metrics: BTreeMap<ComparisonMetric, f64>,
    /// 各指标名次 (从 1 开始, 并列按输入顺序)
    #[serde(default)]
    pub ranks: BTreeMap<ComparisonMetric, u32>,
}

/// 按选定指标排序后的一行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedScenario {
    pub rank: u32,
    pub scenario_id: String,
    pub scenario_name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricWinner {
    pub metric: ComparisonMetric,
    pub best_scenario_id: String,
    pub best_value: f64,
    pub worst_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowestTco {
    pub scenario_id: String,
    pub scenario_name: String,
    pub total_npv: f64,
    pub savings_vs_highest: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioFailure {
    pub scenario_id: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// 输入顺序
    pub entries: Vec<ComparisonEntry>,
    pub ranked_by: ComparisonMetric,
    /// 按 ranked_by 由优到劣
    pub ranking: Vec<RankedScenario>,
    pub best_by_metric: Vec<MetricWinner>,
    /// 最差与最优 NPV 之差
    pub npv_gap: f64,
    pub lowest_tco: Option<LowestTco>,
    pub failures: Vec<ScenarioFailure>,
}
