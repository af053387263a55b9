// ==========================================
// 车队 TCO 分析系统 - 逐年成本预测
// ==========================================
// 职责: 合并各引擎输出 → 逐年名义成本 / NPV + 汇总 KPI
// ==========================================
// 规则:
// - 周期性成本 (维护/燃料/停机) 乘以 (1+通胀)^(year-1)
// - 一次性任务成本只在第1年确认, 第2年起扣除
// - 部件更换成本在排程时已通胀, 直接累加
// - 年度成本按 (1+折现率)^year 折现
// ==========================================

use crate::domain::result::{
    DowntimeSummary, FuelSummary, Projection, ProjectionRow, ProjectionSummary,
    ReplacementSchedule, StaffingSummary, TaskCostSummary,
};
use crate::domain::scenario::ResolvedScenario;
use tracing::debug;

/// 预测引擎输入 (均为只读借用)
pub struct ProjectionInputs<'a> {
    pub resolved: &'a ResolvedScenario,
    pub task_costs: &'a TaskCostSummary,
    pub fuel: &'a FuelSummary,
    pub downtime: &'a DowntimeSummary,
    pub replacements: &'a ReplacementSchedule,
    pub staffing: &'a StaffingSummary,
    /// 按投运比例加权的逐年技术员人数
    pub yearly_technicians: &'a [u32],
}

// ==========================================
// ProjectionEngine - 逐年预测引擎
// ==========================================
pub struct ProjectionEngine;

impl ProjectionEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn project(&self, inputs: &ProjectionInputs<'_>) -> Projection {
        let scenario = &inputs.resolved.scenario;
        let period_years = scenario.analysis_period_years;
        let inflation = scenario.inflation_rate();
        let discount_rate = scenario.discount_rate();

        let annual_maintenance_cost = inputs.task_costs.total_cost;
        let annual_fuel_cost = if inputs.fuel.enabled {
            inputs.fuel.total_annual_cost
        } else {
            0.0
        };
        let annual_downtime_cost = if inputs.downtime.enabled {
            inputs.downtime.total_annual_cost
        } else {
            0.0
        };
        let one_time_cost = inputs
            .task_costs
            .one_time_cost_with_overhead(scenario.overhead_fraction());

        let mut rows = Vec::with_capacity(period_years as usize);
        let mut cumulative_nominal = 0.0;
        let mut cumulative_npv = 0.0;

        for year in 1..=period_years {
            let inflation_multiplier = (1.0 + inflation).powi(year as i32 - 1);
            let maintenance_cost = annual_maintenance_cost * inflation_multiplier;
            let fuel_cost = annual_fuel_cost * inflation_multiplier;
            let downtime_cost = annual_downtime_cost * inflation_multiplier;
            let one_time_adjustment = if year > 1 {
                -one_time_cost * inflation_multiplier
            } else {
                0.0
            };
            let replacement_cost = inputs.replacements.cost_in_year(year);

            let total_cost =
                maintenance_cost + fuel_cost + downtime_cost + one_time_adjustment + replacement_cost;
            cumulative_nominal += total_cost;

            let discount_factor = 1.0 / (1.0 + discount_rate).powi(year as i32);
            let discounted_cost = total_cost * discount_factor;
            cumulative_npv += discounted_cost;

            let technicians = inputs
                .yearly_technicians
                .get((year - 1) as usize)
                .copied()
                .unwrap_or(inputs.staffing.steady_state_technicians);

            rows.push(ProjectionRow {
                year,
                inflation_multiplier,
                maintenance_cost,
                fuel_cost,
                downtime_cost,
                one_time_adjustment,
                replacement_cost,
                total_cost,
                cumulative_nominal,
                discount_factor,
                discounted_cost,
                cumulative_npv,
                technicians,
            });
        }

        let summary = self.summarize(
            inputs,
            annual_maintenance_cost,
            annual_fuel_cost,
            annual_downtime_cost,
            cumulative_nominal,
            cumulative_npv,
        );

        debug!(
            period_years,
            total_nominal = summary.total_nominal,
            total_npv = summary.total_npv,
            "逐年预测完成"
        );

        Projection { rows, summary }
    }

    fn summarize(
        &self,
        inputs: &ProjectionInputs<'_>,
        annual_maintenance_cost: f64,
        annual_fuel_cost: f64,
        annual_downtime_cost: f64,
        total_nominal: f64,
        total_npv: f64,
    ) -> ProjectionSummary {
        let resolved = inputs.resolved;
        let period_years = resolved.scenario.analysis_period_years;
        let total_kw = resolved.total_kw();
        let avg_annual_hours = resolved.avg_annual_hours();
        let total_annual_operating_hours = resolved.total_annual_operating_hours();

        let kwh = total_kw * avg_annual_hours;
        let cost_per_kwh = safe_ratio(annual_maintenance_cost, kwh);
        let cost_per_operating_hour =
            safe_ratio(annual_maintenance_cost, total_annual_operating_hours);

        ProjectionSummary {
            analysis_period_years: period_years,
            total_units: resolved.total_units(),
            total_kw,
            avg_annual_hours,
            total_annual_operating_hours,
            annual_maintenance_cost,
            annual_fuel_cost,
            annual_downtime_cost,
            annual_total_cost: annual_maintenance_cost + annual_fuel_cost + annual_downtime_cost,
            total_nominal,
            total_npv,
            avg_annual_nominal: safe_ratio(total_nominal, period_years as f64),
            avg_annual_npv: safe_ratio(total_npv, period_years as f64),
            cost_per_kwh,
            cost_per_operating_hour,
            technicians_needed: inputs.staffing.technicians_needed,
            technician_utilization: inputs.staffing.utilization,
        }
    }
}

impl Default for ProjectionEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}
