// ==========================================
// 车队 TCO 分析系统 - 停机成本估算
// ==========================================
// 停机小时 = Σ 年服务次数 × 单次停机小时 (缺省取人工小时)
// 一次性任务在投运前完成, 不计停机
// ==========================================

use crate::domain::pm_task::PmTask;
use crate::domain::result::{DowntimeSummary, TaskCostSummary};
use crate::domain::scenario::Scenario;
use crate::domain::types::TaskStatus;
use tracing::debug;

pub struct DowntimeEstimator;

impl DowntimeEstimator {
    pub fn new() -> Self {
        Self
    }

    /// `task_costs.rows` 与 `tasks` 一一对应 (同序)
    pub fn estimate(
        &self,
        scenario: &Scenario,
        tasks: &[PmTask],
        task_costs: &TaskCostSummary,
    ) -> DowntimeSummary {
        if !scenario.include_downtime {
            return DowntimeSummary {
                enabled: false,
                annual_downtime_hours: 0.0,
                cost_per_hour: scenario.downtime_cost_per_hour,
                total_annual_cost: 0.0,
            };
        }

        let annual_downtime_hours: f64 = tasks
            .iter()
            .zip(task_costs.rows.iter())
            .filter(|(_, row)| row.status == TaskStatus::Active && !row.is_one_time())
            .map(|(task, row)| row.services_per_year * task.downtime_hours())
            .sum();

        let total_annual_cost = annual_downtime_hours * scenario.downtime_cost_per_hour;
        debug!(annual_downtime_hours, total_annual_cost, "停机成本估算完成");

        DowntimeSummary {
            enabled: true,
            annual_downtime_hours,
            cost_per_hour: scenario.downtime_cost_per_hour,
            total_annual_cost,
        }
    }
}

impl Default for DowntimeEstimator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price::PriceCatalog;
    use crate::domain::scenario::LaborRates;
    use crate::engine::task_cost::TaskCostEngine;

    fn create_test_scenario(include_downtime: bool) -> Scenario {
        Scenario {
            scenario_id: "S1".to_string(),
            name: "停机方案".to_string(),
            fleet_id: Some("F1".to_string()),
            pm_schedule_id: Some("PM1".to_string()),
            price_list_id: Some("PL1".to_string()),
            analysis_period_years: 5,
            labor_rates: LaborRates::new(100.0, 150.0, 200.0),
            working_days_per_year: 250.0,
            hours_per_day: 8.0,
            target_utilization_pct: 75.0,
            parts_discount_pct: 0.0,
            overhead_markup_pct: 0.0,
            discount_rate_pct: 0.0,
            inflation_rate_pct: 0.0,
            fuel_price_per_unit: 0.0,
            downtime_cost_per_hour: 250.0,
            include_fuel: false,
            include_downtime,
        }
    }

    fn create_test_tasks() -> Vec<PmTask> {
        let base = PmTask {
            task_id: "T1".to_string(),
            name: "季度检查".to_string(),
            interval_hours: None,
            interval_months: Some(3.0),
            is_one_time: false,
            labor_hours_per_service: 4.0,
            skill_level: "basic".to_string(),
            is_automated: false,
            enabled: true,
            is_locked: false,
            downtime_hours_per_service: Some(1.0),
            parts: vec![],
        };
        let fallback = PmTask {
            task_id: "T2".to_string(),
            interval_months: Some(12.0),
            downtime_hours_per_service: None,
            ..base.clone()
        };
        let commissioning = PmTask {
            task_id: "T3".to_string(),
            interval_months: None,
            is_one_time: true,
            ..base.clone()
        };
        vec![base, fallback, commissioning]
    }

    #[test]
    fn test_downtime_hours_and_cost() {
        let scenario = create_test_scenario(true);
        let tasks = create_test_tasks();
        let costs = TaskCostEngine::new()
            .calculate(&tasks, &scenario, 2, 4000.0, &PriceCatalog::default())
            .unwrap();

        let summary = DowntimeEstimator::new().estimate(&scenario, &tasks, &costs);
        // T1: 8 次 × 1h; T2: 2 次 × 4h (取人工小时); T3 一次性不计
        assert!((summary.annual_downtime_hours - 16.0).abs() < 1e-9);
        assert!((summary.total_annual_cost - 4000.0).abs() < 1e-9);
    }

    #[test]
    fn test_disabled_flag() {
        let scenario = create_test_scenario(false);
        let tasks = create_test_tasks();
        let costs = TaskCostEngine::new()
            .calculate(&tasks, &scenario, 2, 4000.0, &PriceCatalog::default())
            .unwrap();
        let summary = DowntimeEstimator::new().estimate(&scenario, &tasks, &costs);
        assert!(!summary.enabled);
        assert_eq!(summary.total_annual_cost, 0.0);
    }
}
