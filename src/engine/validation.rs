// ==========================================
// 车队 TCO 分析系统 - 方案校验
// ==========================================
// 职责: 计算开始前拦截配置错误
// 红线: 不允许把缺失引用/非法参数静默算成零成本结果
// ==========================================

use crate::domain::scenario::{ResolvedScenario, Scenario};
use crate::domain::types::SkillTier;
use crate::engine::error::{EngineError, EngineResult};
use tracing::warn;

pub struct ScenarioValidator;

impl ScenarioValidator {
    pub fn new() -> Self {
        Self
    }

    /// 校验已解析方案, 返回第一个配置错误
    pub fn validate(&self, resolved: &ResolvedScenario) -> EngineResult<()> {
        let result = self.check(resolved);
        if let Err(e) = &result {
            warn!(scenario_id = %resolved.scenario_id(), error = %e, "方案校验未通过");
        }
        result
    }

    fn check(&self, resolved: &ResolvedScenario) -> EngineResult<()> {
        let scenario = &resolved.scenario;
        let id = scenario.scenario_id.clone();

        // ===== 引用 =====
        if scenario.fleet_id.is_none() {
            return Err(EngineError::MissingFleet(id));
        }
        if scenario.pm_schedule_id.is_none() {
            return Err(EngineError::MissingPmSchedule(id));
        }
        if scenario.price_list_id.is_none() {
            return Err(EngineError::MissingPriceCatalog(id));
        }
        if resolved.fleet.is_empty() || resolved.total_units() == 0 {
            return Err(EngineError::EmptyFleet(id));
        }

        Self::check_scenario_fields(scenario)?;

        // ===== 车队 =====
        for unit in &resolved.fleet {
            let field = format!("fleet[{}]", unit.fleet_unit_id);
            let hours = unit.effective_annual_hours();
            if !hours.is_finite() || hours < 0.0 {
                return Err(EngineError::invalid_parameter(
                    &format!("{}.annual_operating_hours", field),
                    format!("年运行小时必须 >= 0, 实际 {}", hours),
                ));
            }
            if !(0.0..=1.0).contains(&unit.duty_cycle) {
                return Err(EngineError::invalid_parameter(
                    &format!("{}.duty_cycle", field),
                    format!("负载率必须在 [0, 1], 实际 {}", unit.duty_cycle),
                ));
            }
            non_negative(
                &format!("{}.rated_power_kw", field),
                unit.equipment_model.rated_power_kw,
            )?;
        }

        // ===== 维护任务 =====
        for task in &resolved.pm_tasks {
            task.skill_level
                .parse::<SkillTier>()
                .map_err(|_| EngineError::UnrecognizedSkillTier {
                    task_id: task.task_id.clone(),
                    value: task.skill_level.clone(),
                })?;
            if !task.labor_hours_per_service.is_finite() || task.labor_hours_per_service < 0.0 {
                return Err(EngineError::invalid_parameter(
                    &format!("pm_tasks[{}].labor_hours_per_service", task.task_id),
                    "单次人工小时必须 >= 0",
                ));
            }
            for (idx, part) in task.parts.iter().enumerate() {
                non_negative(
                    &format!("pm_tasks[{}].parts[{}].quantity", task.task_id, idx),
                    part.quantity,
                )?;
            }
        }

        // ===== 价格目录 =====
        for item in resolved.price_catalog.items() {
            if let Some(price) = item.unit_price {
                non_negative(&format!("price_catalog[{}].unit_price", item.part_number), price)?;
            }
        }

        // ===== 部件寿命 (寿命/形状参数由可靠性模型按部件降级处理) =====
        for component in &resolved.components {
            non_negative(
                &format!("components[{}].replacement_labor_hours", component.component_id),
                component.replacement_labor_hours,
            )?;
        }

        Ok(())
    }

    fn check_scenario_fields(scenario: &Scenario) -> EngineResult<()> {
        if scenario.analysis_period_years == 0 {
            return Err(EngineError::invalid_parameter(
                "analysis_period_years",
                "分析周期必须 > 0",
            ));
        }

        for (tier, rate) in scenario.labor_rates.iter() {
            non_negative(&format!("labor_rates.{}", tier), rate)?;
        }

        in_range("parts_discount_pct", scenario.parts_discount_pct, 0.0, 100.0)?;
        in_range("overhead_markup_pct", scenario.overhead_markup_pct, 0.0, 100.0)?;

        let util = scenario.target_utilization_pct;
        if !(util > 0.0 && util <= 100.0) {
            return Err(EngineError::invalid_parameter(
                "target_utilization_pct",
                format!("目标利用率必须在 (0, 100], 实际 {}", util),
            ));
        }

        positive("working_days_per_year", scenario.working_days_per_year)?;
        positive("hours_per_day", scenario.hours_per_day)?;
        non_negative("discount_rate_pct", scenario.discount_rate_pct)?;
        non_negative("inflation_rate_pct", scenario.inflation_rate_pct)?;
        non_negative("fuel_price_per_unit", scenario.fuel_price_per_unit)?;
        non_negative("downtime_cost_per_hour", scenario.downtime_cost_per_hour)?;
        Ok(())
    }
}

impl Default for ScenarioValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn non_negative(field: &str, value: f64) -> EngineResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(EngineError::invalid_parameter(
            field,
            format!("必须 >= 0, 实际 {}", value),
        ))
    }
}

fn positive(field: &str, value: f64) -> EngineResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(EngineError::invalid_parameter(
            field,
            format!("必须 > 0, 实际 {}", value),
        ))
    }
}

fn in_range(field: &str, value: f64, min: f64, max: f64) -> EngineResult<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(EngineError::invalid_parameter(
            field,
            format!("必须在 [{}, {}], 实际 {}", min, max, value),
        ))
    }
}
