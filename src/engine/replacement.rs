// ==========================================
// 车队 TCO 分析系统 - 部件更换计划
// ==========================================
// 职责: (部件寿命, 同型号机组组) → 离散更换事件 + 通胀后成本
// 边界: 恰好落在分析期末的更换不计入 (下一周期才发生)
// ==========================================

use crate::config::EngineConfig;
use crate::domain::component::ComponentLifecycle;
use crate::domain::fleet::FleetUnit;
use crate::domain::price::PriceCatalog;
use crate::domain::result::{ReplacementEvent, ReplacementSchedule};
use crate::domain::scenario::Scenario;
use crate::domain::types::{ReplacementBasis, SkillTier};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::reliability::{replacements_through, WeibullDistribution};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

// 浮点误差容限, 避免 ceil(1.0000000001) = 2
const YEAR_EPSILON: f64 = 1e-9;

// ==========================================
// ComponentReplacementScheduler
// ==========================================
pub struct ComponentReplacementScheduler;

impl ComponentReplacementScheduler {
    pub fn new() -> Self {
        Self
    }

    /// 生成更换计划
    ///
    /// 人工按 specialist 费率计价; 成本按事件所在年份 (1+通胀)^year 通胀
    pub fn schedule(
        &self,
        scenario: &Scenario,
        components: &[ComponentLifecycle],
        fleet: &[FleetUnit],
        catalog: &PriceCatalog,
        config: &EngineConfig,
    ) -> EngineResult<ReplacementSchedule> {
        let period_years = scenario.analysis_period_years;
        let labor_rate = scenario.labor_rates.rate(SkillTier::Specialist);
        let inflation = scenario.inflation_rate();

        let mut events = Vec::new();
        let mut unpriced = BTreeSet::new();

        for component in components {
            let life_hours = Self::life_hours(component, config)?;

            let part_cost = match component.part_number.as_deref() {
                Some(pn) => catalog.unit_price(pn).unwrap_or_else(|| {
                    unpriced.insert(pn.trim().to_string());
                    0.0
                }),
                None => 0.0,
            };
            let unit_cost = component.replacement_labor_hours * labor_rate + part_cost;

            for unit in fleet
                .iter()
                .filter(|u| u.equipment_model.model_id == component.equipment_model_id)
            {
                let annual_hours = unit.effective_annual_hours();
                if annual_hours <= 0.0 || unit.quantity == 0 {
                    continue;
                }

                let years_per_replacement = life_hours / annual_hours;
                let horizon_hours = annual_hours * period_years as f64;
                let count = replacements_through(horizon_hours, life_hours, horizon_hours);

                for r in 1..=count {
                    let year = ((years_per_replacement * r as f64) - YEAR_EPSILON)
                        .ceil()
                        .max(1.0) as u32;
                    if year > period_years {
                        continue;
                    }
                    let multiplier = (1.0 + inflation).powi(year as i32);
                    events.push(ReplacementEvent {
                        component_id: component.component_id.clone(),
                        component_name: component.component_name.clone(),
                        fleet_unit_id: unit.fleet_unit_id.clone(),
                        replacement_number: r,
                        year,
                        units: unit.quantity,
                        unit_cost,
                        inflated_cost: unit_cost * multiplier * unit.quantity as f64,
                    });
                }
            }
        }

        let mut cost_by_year: BTreeMap<u32, f64> = BTreeMap::new();
        for event in &events {
            *cost_by_year.entry(event.year).or_insert(0.0) += event.inflated_cost;
        }
        let total_over_period = events.iter().map(|e| e.inflated_cost).sum();

        debug!(
            events = events.len(),
            total_over_period,
            unpriced = unpriced.len(),
            "部件更换计划生成完成"
        );

        Ok(ReplacementSchedule {
            events,
            cost_by_year,
            total_over_period,
            unpriced_parts: unpriced.into_iter().collect(),
        })
    }

    /// 计划用寿命: 平均寿命 或 Weibull B10 寿命
    fn life_hours(component: &ComponentLifecycle, config: &EngineConfig) -> EngineResult<f64> {
        if component.mean_life_hours.is_nan() || component.mean_life_hours <= 0.0 {
            return Err(EngineError::InvalidWeibull {
                parameter: "mean_life_hours".to_string(),
                value: component.mean_life_hours,
            });
        }
        match config.replacement_basis {
            ReplacementBasis::MeanLife => Ok(component.mean_life_hours),
            ReplacementBasis::B10Life => {
                let shape = component.shape_or(config.default_weibull_shape);
                let dist = match component.weibull_scale {
                    Some(scale) => WeibullDistribution::from_scale(scale, shape)?,
                    None => WeibullDistribution::from_mean_life(component.mean_life_hours, shape)?,
                };
                Ok(dist.b10())
            }
        }
    }
}

impl Default for ComponentReplacementScheduler {
    fn default() -> Self {
        Self::new()
    }
}
