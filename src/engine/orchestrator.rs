// ==========================================
// 车队 TCO 分析系统 - 分析编排器
// ==========================================
// 用途: 协调各引擎的执行顺序, 单个已解析方案 → AnalysisResult
// 流程: 校验 → 任务成本 / 可靠性 / 燃料 (互不依赖)
//       → 停机 / 部件更换 / 人员配置 → 逐年预测 → 成本类别汇总
// ==========================================
// 红线: 纯函数, 不访问存储, 同一输入得到完全相同的输出
// ==========================================

use crate::config::EngineConfig;
use crate::domain::component::ComponentLifecycle;
use crate::domain::result::{
    AnalysisResult, AnalysisWarning, ComponentReliability, CostCategoryRow,
};
use crate::domain::scenario::ResolvedScenario;
use crate::domain::types::{CostCategory, SkillTier, TaskStatus};
use crate::engine::comparison::ComparisonEngine;
use crate::engine::downtime::DowntimeEstimator;
use crate::engine::error::EngineResult;
use crate::engine::fuel::FuelCostEstimator;
use crate::engine::projection::{ProjectionEngine, ProjectionInputs};
use crate::engine::reliability::ReliabilityModel;
use crate::engine::replacement::ComponentReplacementScheduler;
use crate::engine::staffing::StaffingPlanner;
use crate::engine::task_cost::TaskCostEngine;
use crate::engine::validation::ScenarioValidator;
use crate::perf::PerfGuard;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

pub const WARN_RELIABILITY: &str = "RELIABILITY_DOMAIN_ERROR";
pub const WARN_UNPRICED_PART: &str = "UNPRICED_PART";
pub const WARN_MISSING_FUEL_PROFILE: &str = "MISSING_FUEL_PROFILE";
pub const WARN_UNSCHEDULED_TASK: &str = "UNSCHEDULED_TASK";

// ==========================================
// AnalysisOrchestrator - 分析编排器
// ==========================================
pub struct AnalysisOrchestrator {
    config: EngineConfig,
    validator: ScenarioValidator,
    reliability: ReliabilityModel,
    task_cost: TaskCostEngine,
    staffing: StaffingPlanner,
    fuel: FuelCostEstimator,
    downtime: DowntimeEstimator,
    replacement: ComponentReplacementScheduler,
    projection: ProjectionEngine,
    comparison: ComparisonEngine,
}

impl AnalysisOrchestrator {
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - config: 引擎参数
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            validator: ScenarioValidator::new(),
            reliability: ReliabilityModel::new(),
            task_cost: TaskCostEngine::new(),
            staffing: StaffingPlanner::new(),
            fuel: FuelCostEstimator::new(),
            downtime: DowntimeEstimator::new(),
            replacement: ComponentReplacementScheduler::new(),
            projection: ProjectionEngine::new(),
            comparison: ComparisonEngine::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn comparison(&self) -> &ComparisonEngine {
        &self.comparison
    }

    /// 执行完整分析流程
    ///
    /// # 返回
    /// - Ok(AnalysisResult): 分析结果 (部件级可靠性错误已降级为告警)
    /// - Err(EngineError): 配置错误, 计算未开始
    pub fn run(&self, resolved: &ResolvedScenario) -> EngineResult<AnalysisResult> {
        let _perf = PerfGuard::new("analysis.run");
        let scenario = &resolved.scenario;

        info!(
            scenario_id = %scenario.scenario_id,
            fleet_units = resolved.fleet.len(),
            pm_tasks = resolved.pm_tasks.len(),
            components = resolved.components.len(),
            period_years = scenario.analysis_period_years,
            "开始执行 TCO 分析"
        );

        // ==========================================
        // 步骤1: 配置校验
        // ==========================================
        self.validator.validate(resolved)?;

        let total_units = resolved.total_units();
        let avg_annual_hours = resolved.avg_annual_hours();
        let mut warnings = Vec::new();

        // ==========================================
        // 步骤2: 维护任务成本
        // ==========================================
        debug!("步骤2: 计算维护任务成本");
        let task_costs = self.task_cost.calculate(
            &resolved.pm_tasks,
            scenario,
            total_units,
            avg_annual_hours,
            &resolved.price_catalog,
        )?;
        for row in task_costs
            .rows
            .iter()
            .filter(|r| r.status == TaskStatus::Unscheduled)
        {
            warnings.push(AnalysisWarning {
                code: WARN_UNSCHEDULED_TASK.to_string(),
                component_id: None,
                message: format!("任务 {} 无有效周期, 不计成本", row.task_id),
            });
        }

        // ==========================================
        // 步骤3: 部件可靠性 (单部件失败降级为告警)
        // ==========================================
        debug!("步骤3: 计算部件可靠性");
        let (reliability, valid_components) =
            self.component_reliability(resolved, &mut warnings);

        // ==========================================
        // 步骤4: 燃料 / 停机
        // ==========================================
        debug!("步骤4: 估算燃料与停机成本");
        let fuel = self.fuel.estimate(scenario, &resolved.fleet, &self.config);
        for fleet_unit_id in &fuel.missing_profiles {
            warnings.push(AnalysisWarning {
                code: WARN_MISSING_FUEL_PROFILE.to_string(),
                component_id: None,
                message: format!("机组组 {} 缺少燃料消耗档位, 燃料成本按 0 计", fleet_unit_id),
            });
        }
        let downtime = self
            .downtime
            .estimate(scenario, &resolved.pm_tasks, &task_costs);

        // ==========================================
        // 步骤5: 部件更换计划
        // ==========================================
        debug!("步骤5: 生成部件更换计划");
        let replacements = self.replacement.schedule(
            scenario,
            &valid_components,
            &resolved.fleet,
            &resolved.price_catalog,
            &self.config,
        )?;

        // ==========================================
        // 步骤6: 人员配置
        // ==========================================
        debug!("步骤6: 规划人员配置");
        let staffing = self
            .staffing
            .plan(scenario, &task_costs, &resolved.fleet, &self.config)?;
        let yearly_technicians = self.staffing.yearly_technicians(
            &staffing,
            &resolved.fleet,
            scenario.analysis_period_years,
        );

        // ==========================================
        // 步骤7: 逐年预测
        // ==========================================
        debug!("步骤7: 逐年成本预测");
        let projection = self.projection.project(&ProjectionInputs {
            resolved,
            task_costs: &task_costs,
            fuel: &fuel,
            downtime: &downtime,
            replacements: &replacements,
            staffing: &staffing,
            yearly_technicians: &yearly_technicians,
        });

        // ==========================================
        // 步骤8: 成本类别与未定价料号
        // ==========================================
        let cost_categories = Self::cost_categories(
            task_costs.total_labor_cost,
            task_costs.total_parts_cost,
            task_costs.overhead_cost,
            projection.summary.annual_fuel_cost,
            projection.summary.annual_downtime_cost,
            replacements.total_over_period / scenario.analysis_period_years as f64,
        );

        let unpriced_parts: Vec<String> = task_costs
            .unpriced_parts
            .iter()
            .chain(replacements.unpriced_parts.iter())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        for part_number in &unpriced_parts {
            warnings.push(AnalysisWarning {
                code: WARN_UNPRICED_PART.to_string(),
                component_id: None,
                message: format!("料号 {} 未在价格目录中定价, 按 0 计", part_number),
            });
        }

        info!(
            scenario_id = %scenario.scenario_id,
            total_npv = projection.summary.total_npv,
            total_nominal = projection.summary.total_nominal,
            technicians = staffing.technicians_needed,
            warnings = warnings.len(),
            "TCO 分析完成"
        );

        Ok(AnalysisResult {
            scenario_id: scenario.scenario_id.clone(),
            scenario_name: scenario.name.clone(),
            summary: projection.summary,
            task_costs,
            cost_categories,
            projection: projection.rows,
            staffing,
            fuel,
            downtime,
            replacements,
            reliability,
            unpriced_parts,
            warnings,
        })
    }

    /// 逐部件计算可靠性; 返回 (成功汇总, 可参与更换排程的部件)
    fn component_reliability(
        &self,
        resolved: &ResolvedScenario,
        warnings: &mut Vec<AnalysisWarning>,
    ) -> (Vec<ComponentReliability>, Vec<ComponentLifecycle>) {
        let specialist_rate = resolved.scenario.labor_rates.rate(SkillTier::Specialist);
        let mut summaries = Vec::with_capacity(resolved.components.len());
        let mut valid = Vec::with_capacity(resolved.components.len());

        for component in &resolved.components {
            let part_cost = component
                .part_number
                .as_deref()
                .and_then(|pn| resolved.price_catalog.unit_price(pn))
                .unwrap_or(0.0);
            let planned_cost = part_cost + component.replacement_labor_hours * specialist_rate;

            match self
                .reliability
                .component_summary(component, planned_cost, &self.config)
            {
                Ok(summary) => {
                    summaries.push(summary);
                    valid.push(component.clone());
                }
                Err(e) => {
                    warn!(component_id = %component.component_id, error = %e, "部件可靠性计算失败, 已跳过");
                    warnings.push(AnalysisWarning {
                        code: WARN_RELIABILITY.to_string(),
                        component_id: Some(component.component_id.clone()),
                        message: e.to_string(),
                    });
                }
            }
        }

        (summaries, valid)
    }

    /// 年化成本类别占比
    pub fn cost_categories(
        labor: f64,
        parts: f64,
        overhead: f64,
        fuel: f64,
        downtime: f64,
        replacements_per_year: f64,
    ) -> Vec<CostCategoryRow> {
        let values = [
            (CostCategory::Labor, labor),
            (CostCategory::Parts, parts),
            (CostCategory::Overhead, overhead),
            (CostCategory::Fuel, fuel),
            (CostCategory::Downtime, downtime),
            (CostCategory::Replacements, replacements_per_year),
        ];
        let total: f64 = values.iter().map(|(_, v)| v).sum();

        values
            .iter()
            .map(|(category, annual_cost)| CostCategoryRow {
                category: *category,
                annual_cost: *annual_cost,
                pct_of_total: if total > 0.0 {
                    annual_cost / total * 100.0
                } else {
                    0.0
                },
            })
            .collect()
    }
}

impl Default for AnalysisOrchestrator {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fleet::{EquipmentModel, FleetUnit};
    use crate::domain::pm_task::{PmTask, TaskPart};
    use crate::domain::price::{PriceCatalog, PriceListItem};
    use crate::domain::scenario::{LaborRates, Scenario};
    use crate::engine::error::EngineError;

    fn create_test_resolved() -> ResolvedScenario {
        ResolvedScenario {
            scenario: Scenario {
                scenario_id: "S1".to_string(),
                name: "编排方案".to_string(),
                fleet_id: Some("F1".to_string()),
                pm_schedule_id: Some("PM1".to_string()),
                price_list_id: Some("PL1".to_string()),
                analysis_period_years: 5,
                labor_rates: LaborRates::new(100.0, 150.0, 200.0),
                working_days_per_year: 250.0,
                hours_per_day: 8.0,
                target_utilization_pct: 75.0,
                parts_discount_pct: 0.0,
                overhead_markup_pct: 10.0,
                discount_rate_pct: 0.0,
                inflation_rate_pct: 0.0,
                fuel_price_per_unit: 0.0,
                downtime_cost_per_hour: 0.0,
                include_fuel: false,
                include_downtime: false,
            },
            fleet: vec![FleetUnit {
                fleet_unit_id: "FU-1".to_string(),
                equipment_model: EquipmentModel {
                    model_id: "GEN-500".to_string(),
                    name: "500kW 机组".to_string(),
                    rated_power_kw: 500.0,
                    default_annual_hours: 4000.0,
                    fuel: None,
                },
                quantity: 2,
                annual_operating_hours: None,
                duty_cycle: 0.75,
                commissioning_rate_per_month: None,
            }],
            pm_tasks: vec![PmTask {
                task_id: "T1".to_string(),
                name: "换机油".to_string(),
                interval_hours: Some(500.0),
                interval_months: None,
                is_one_time: false,
                labor_hours_per_service: 1.0,
                skill_level: "basic".to_string(),
                is_automated: false,
                enabled: true,
                is_locked: false,
                downtime_hours_per_service: None,
                parts: vec![TaskPart {
                    part_number: Some("GHOST-1".to_string()),
                    quantity: 1.0,
                    is_optional: false,
                }],
            }],
            price_catalog: PriceCatalog::new(
                "PL1",
                vec![PriceListItem {
                    part_number: "TC-1".to_string(),
                    description: None,
                    unit_price: Some(400.0),
                }],
            ),
            components: vec![
                ComponentLifecycle {
                    component_id: "C-OK".to_string(),
                    equipment_model_id: "GEN-500".to_string(),
                    component_name: "涡轮增压器".to_string(),
                    part_number: Some("TC-1".to_string()),
                    mean_life_hours: 8000.0,
                    min_life_hours: None,
                    max_life_hours: None,
                    replacement_labor_hours: 4.0,
                    weibull_shape: None,
                    weibull_scale: None,
                },
                ComponentLifecycle {
                    component_id: "C-BAD".to_string(),
                    equipment_model_id: "GEN-500".to_string(),
                    component_name: "坏数据".to_string(),
                    part_number: None,
                    mean_life_hours: 6000.0,
                    min_life_hours: None,
                    max_life_hours: None,
                    replacement_labor_hours: 1.0,
                    weibull_shape: Some(-1.0),
                    weibull_scale: None,
                },
            ],
        }
    }

    #[test]
    fn test_component_domain_error_becomes_warning() {
        let result = AnalysisOrchestrator::default()
            .run(&create_test_resolved())
            .unwrap();

        assert_eq!(result.reliability.len(), 1);
        assert_eq!(result.reliability[0].component_id, "C-OK");
        assert!((result.reliability[0].planned_cost - 1000.0).abs() < 1e-9);

        let warning = result
            .warnings
            .iter()
            .find(|w| w.code == WARN_RELIABILITY)
            .unwrap();
        assert_eq!(warning.component_id.as_deref(), Some("C-BAD"));
        assert!(result.replacements.events.iter().all(|e| e.component_id == "C-OK"));
    }

    #[test]
    fn test_unpriced_parts_are_reported() {
        let result = AnalysisOrchestrator::default()
            .run(&create_test_resolved())
            .unwrap();
        assert_eq!(result.unpriced_parts, vec!["GHOST-1".to_string()]);
        assert!(result.warnings.iter().any(|w| w.code == WARN_UNPRICED_PART));
    }

    #[test]
    fn test_unscheduled_task_is_reported() {
        let mut resolved = create_test_resolved();
        let mut adhoc = resolved.pm_tasks[0].clone();
        adhoc.task_id = "T-ADHOC".to_string();
        adhoc.interval_hours = None;
        adhoc.parts.clear();
        resolved.pm_tasks.push(adhoc);

        let result = AnalysisOrchestrator::default().run(&resolved).unwrap();

        let row = result
            .task_costs
            .rows
            .iter()
            .find(|r| r.task_id == "T-ADHOC")
            .unwrap();
        assert_eq!(row.status, TaskStatus::Unscheduled);
        assert_eq!(row.total_cost_per_year, 0.0);

        let unscheduled: Vec<&AnalysisWarning> = result
            .warnings
            .iter()
            .filter(|w| w.code == WARN_UNSCHEDULED_TASK)
            .collect();
        assert_eq!(unscheduled.len(), 1);
        assert!(unscheduled[0].message.contains("T-ADHOC"));
        assert!(unscheduled[0].component_id.is_none());
    }

    #[test]
    fn test_tiny_commissioning_rate_runs() {
        let mut resolved = create_test_resolved();
        resolved.fleet[0].commissioning_rate_per_month = Some(1e-9);

        let result = AnalysisOrchestrator::default().run(&resolved).unwrap();
        assert_eq!(result.staffing.ramp.len(), 120);
        assert_eq!(result.projection.len(), 5);
    }

    #[test]
    fn test_configuration_error_stops_run() {
        let mut resolved = create_test_resolved();
        resolved.fleet.clear();
        assert_eq!(
            AnalysisOrchestrator::default().run(&resolved).unwrap_err(),
            EngineError::EmptyFleet("S1".to_string())
        );
    }

    #[test]
    fn test_cost_categories_shares() {
        let rows = AnalysisOrchestrator::cost_categories(600.0, 200.0, 80.0, 0.0, 0.0, 120.0);
        assert_eq!(rows.len(), 6);
        let pct_sum: f64 = rows.iter().map(|r| r.pct_of_total).sum();
        assert!((pct_sum - 100.0).abs() < 1e-9);
        assert!((rows[0].pct_of_total - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_run_is_deterministic() {
        let orchestrator = AnalysisOrchestrator::default();
        let resolved = create_test_resolved();
        assert_eq!(
            orchestrator.run(&resolved).unwrap(),
            orchestrator.run(&resolved).unwrap()
        );
    }
}
