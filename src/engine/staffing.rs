// ==========================================
// 车队 TCO 分析系统 - 人员配置规划
// ==========================================
// 职责: 年人工小时 → 技术员人数 + 按月投运爬坡
// 公式: 人数 = ceil(年人工小时 × 安全系数 / 人均可用小时)
// ==========================================

use crate::config::EngineConfig;
use crate::domain::fleet::FleetUnit;
use crate::domain::result::{StaffingRampRow, StaffingSummary, TaskCostSummary};
use crate::domain::scenario::Scenario;
use crate::engine::error::{EngineError, EngineResult};
use tracing::debug;

// ==========================================
// StaffingPlanner - 人员配置规划器
// ==========================================
pub struct StaffingPlanner;

impl StaffingPlanner {
    pub fn new() -> Self {
        Self
    }

    /// 人均年可用小时 = 工作日 × 每日小时 × 目标利用率
    pub fn available_hours_per_tech(scenario: &Scenario) -> f64 {
        scenario.working_days_per_year * scenario.hours_per_day * scenario.utilization_fraction()
    }

    /// 所需技术员人数 (向上取整)
    pub fn technicians_for(labor_hours: f64, available_hours: f64, safety_factor: f64) -> u32 {
        if labor_hours <= 0.0 || available_hours <= 0.0 {
            return 0;
        }
        (labor_hours * safety_factor / available_hours).ceil() as u32
    }

    /// 生成人员配置汇总
    ///
    /// - technicians_needed: 含一次性任务工时 (首年)
    /// - steady_state_technicians: 仅周期性任务工时
    pub fn plan(
        &self,
        scenario: &Scenario,
        task_costs: &TaskCostSummary,
        fleet: &[FleetUnit],
        config: &EngineConfig,
    ) -> EngineResult<StaffingSummary> {
        let available = Self::available_hours_per_tech(scenario);
        if available <= 0.0 {
            return Err(EngineError::invalid_parameter(
                "available_hours_per_tech",
                format!("人均可用小时必须 > 0, 实际 {}", available),
            ));
        }

        let safety_factor = config.staffing_safety_factor;
        let total_hours = task_costs.total_labor_hours;
        let recurring_hours = (total_hours - task_costs.one_time_labor_hours).max(0.0);

        let technicians_needed = Self::technicians_for(total_hours, available, safety_factor);
        let steady_state_technicians =
            Self::technicians_for(recurring_hours, available, safety_factor);

        let utilization = if technicians_needed > 0 {
            total_hours / (technicians_needed as f64 * available)
        } else {
            0.0
        };

        let ramp = self.build_ramp(fleet, technicians_needed, config);

        debug!(
            available,
            total_hours,
            technicians_needed,
            steady_state_technicians,
            ramp_months = ramp.len(),
            "人员配置计算完成"
        );

        Ok(StaffingSummary {
            available_hours_per_tech: available,
            safety_factor,
            total_annual_labor_hours: total_hours,
            recurring_labor_hours: recurring_hours,
            technicians_needed,
            steady_state_technicians,
            utilization,
            ramp,
        })
    }

    // ==========================================
    // 投运爬坡
    // ==========================================

    /// 爬坡月数 = max(最小月数, 最长投运月数 + 尾部月数), 不超过上限
    pub fn ramp_months(fleet: &[FleetUnit], config: &EngineConfig) -> u32 {
        let longest = fleet
            .iter()
            .map(FleetUnit::commissioning_months)
            .max()
            .unwrap_or(0);
        longest
            .saturating_add(config.ramp_tail_months)
            .max(config.min_ramp_months)
            .min(config.max_ramp_months)
    }

    /// 第 month 月末累计投运台数
    pub fn units_active(fleet: &[FleetUnit], month: u32) -> f64 {
        fleet.iter().map(|u| u.units_active_at(month)).sum()
    }

    fn deployment_fraction(fleet: &[FleetUnit], month: u32) -> f64 {
        let total: f64 = fleet.iter().map(|u| u.quantity as f64).sum();
        if total <= 0.0 {
            return 0.0;
        }
        Self::units_active(fleet, month) / total
    }

    fn build_ramp(
        &self,
        fleet: &[FleetUnit],
        technicians_needed: u32,
        config: &EngineConfig,
    ) -> Vec<StaffingRampRow> {
        let total_units: f64 = fleet.iter().map(|u| u.quantity as f64).sum();

        (1..=Self::ramp_months(fleet, config))
            .map(|month| {
                let units_active = Self::units_active(fleet, month);
                let (deployment_fraction, technicians) = if total_units > 0.0 {
                    (
                        units_active / total_units,
                        (technicians_needed as f64 * units_active / total_units).ceil() as u32,
                    )
                } else {
                    (0.0, 0)
                };
                StaffingRampRow {
                    month,
                    units_active,
                    deployment_fraction,
                    technicians_needed: technicians,
                }
            })
            .collect()
    }

    /// 按投运比例加权的逐年技术员人数
    ///
    /// 第1年以含一次性工时的需求为基数, 之后以稳态需求为基数;
    /// 每年取当年12个月部署比例的平均值
    pub fn yearly_technicians(
        &self,
        staffing: &StaffingSummary,
        fleet: &[FleetUnit],
        period_years: u32,
    ) -> Vec<u32> {
        (1..=period_years)
            .map(|year| {
                let base = if year == 1 {
                    staffing.technicians_needed
                } else {
                    staffing.steady_state_technicians
                };
                let first_month = (year - 1).saturating_mul(12).saturating_add(1);
                let avg_fraction: f64 = (first_month..first_month.saturating_add(12))
                    .map(|m| Self::deployment_fraction(fleet, m))
                    .sum::<f64>()
                    / 12.0;
                (base as f64 * avg_fraction).ceil() as u32
            })
            .collect()
    }
}

impl Default for StaffingPlanner {
    fn default() -> Self {
        Self::new()
    }
}
