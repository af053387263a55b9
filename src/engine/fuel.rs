// ==========================================
// 车队 TCO 分析系统 - 燃料成本估算
// ==========================================
// 职责: 机组运行画像 → 年燃料支出
// 档位: 负载率 >=0.85 满载; >=0.6 75% 负载; 其余 50% 负载
// 计价单位: 液体按加仑, 气体按 therm
// ==========================================

use crate::config::EngineConfig;
use crate::domain::fleet::{FleetUnit, FuelProfile};
use crate::domain::result::{FuelDetailRow, FuelSummary};
use crate::domain::scenario::Scenario;
use crate::domain::types::{FuelUnit, LoadTier};
use tracing::{debug, warn};

pub const LITERS_PER_GALLON: f64 = 3.78541;
pub const CUBIC_FEET_PER_CUBIC_METER: f64 = 35.3147;

const FULL_LOAD_THRESHOLD: f64 = 0.85;
const THREE_QUARTER_THRESHOLD: f64 = 0.6;

// ==========================================
// FuelCostEstimator - 燃料成本估算器
// ==========================================
pub struct FuelCostEstimator;

impl FuelCostEstimator {
    pub fn new() -> Self {
        Self
    }

    /// 估算车队年燃料成本; 方案未启用燃料时返回全零并标记 disabled
    pub fn estimate(
        &self,
        scenario: &Scenario,
        fleet: &[FleetUnit],
        config: &EngineConfig,
    ) -> FuelSummary {
        if !scenario.include_fuel {
            return FuelSummary {
                enabled: false,
                rows: vec![],
                missing_profiles: vec![],
                total_annual_cost: 0.0,
            };
        }

        let mut rows = Vec::with_capacity(fleet.len());
        let mut missing_profiles = Vec::new();

        for unit in fleet {
            let selected = unit
                .equipment_model
                .fuel
                .as_ref()
                .and_then(|profile| {
                    Self::select_rate(profile, unit.duty_cycle).map(|(tier, rate)| (profile, tier, rate))
                });

            let Some((profile, load_tier, consumption_rate)) = selected else {
                warn!(fleet_unit_id = %unit.fleet_unit_id, "机组缺少燃料消耗档位, 按 0 计");
                missing_profiles.push(unit.fleet_unit_id.clone());
                continue;
            };

            let normalized_rate =
                Self::normalize_rate(profile.unit, consumption_rate, config.cubic_feet_per_therm);
            let annual_hours = unit.effective_annual_hours();
            let annual_cost = normalized_rate
                * annual_hours
                * scenario.fuel_price_per_unit
                * unit.quantity as f64;

            rows.push(FuelDetailRow {
                fleet_unit_id: unit.fleet_unit_id.clone(),
                model_name: unit.equipment_model.name.clone(),
                quantity: unit.quantity,
                annual_hours,
                duty_cycle: unit.duty_cycle,
                load_tier,
                unit: profile.unit,
                consumption_rate,
                normalized_rate,
                annual_cost,
            });
        }

        let total_annual_cost = rows.iter().map(|r| r.annual_cost).sum();
        debug!(rows = rows.len(), total_annual_cost, "燃料成本估算完成");

        FuelSummary {
            enabled: true,
            rows,
            missing_profiles,
            total_annual_cost,
        }
    }

    /// 按负载率选择消耗档位, 缺失时沿 50% → 75% → 满载 回退
    pub fn select_rate(profile: &FuelProfile, duty_cycle: f64) -> Option<(LoadTier, f64)> {
        let full = profile.full_load_rate.map(|r| (LoadTier::Full, r));
        let three_quarter = profile
            .three_quarter_load_rate
            .map(|r| (LoadTier::ThreeQuarter, r));
        let half = profile.half_load_rate.map(|r| (LoadTier::Half, r));

        if duty_cycle >= FULL_LOAD_THRESHOLD {
            full
        } else if duty_cycle >= THREE_QUARTER_THRESHOLD {
            three_quarter.or(full)
        } else {
            half.or(three_quarter).or(full)
        }
    }

    /// 折算到计价单位 (加仑/小时 或 therm/小时)
    pub fn normalize_rate(unit: FuelUnit, rate: f64, cubic_feet_per_therm: f64) -> f64 {
        match unit {
            FuelUnit::GallonsPerHour | FuelUnit::ThermsPerHour => rate,
            FuelUnit::LitersPerHour => rate / LITERS_PER_GALLON,
            FuelUnit::CubicFeetPerHour => rate / cubic_feet_per_therm,
            FuelUnit::CubicMetersPerHour => rate * CUBIC_FEET_PER_CUBIC_METER / cubic_feet_per_therm,
        }
    }
}

impl Default for FuelCostEstimator {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fleet::EquipmentModel;
    use crate::domain::scenario::LaborRates;

    fn create_test_scenario(include_fuel: bool) -> Scenario {
        Scenario {
            scenario_id: "S1".to_string(),
            name: "燃料方案".to_string(),
            fleet_id: Some("F1".to_string()),
            pm_schedule_id: Some("PM1".to_string()),
            price_list_id: Some("PL1".to_string()),
            analysis_period_years: 10,
            labor_rates: LaborRates::new(100.0, 150.0, 200.0),
            working_days_per_year: 250.0,
            hours_per_day: 8.0,
            target_utilization_pct: 75.0,
            parts_discount_pct: 0.0,
            overhead_markup_pct: 0.0,
            discount_rate_pct: 0.0,
            inflation_rate_pct: 0.0,
            fuel_price_per_unit: 4.0,
            downtime_cost_per_hour: 0.0,
            include_fuel,
            include_downtime: false,
        }
    }

    fn create_test_profile(unit: FuelUnit) -> FuelProfile {
        FuelProfile {
            unit,
            full_load_rate: Some(30.0),
            three_quarter_load_rate: Some(24.0),
            half_load_rate: Some(16.0),
        }
    }

    fn create_test_unit(id: &str, duty_cycle: f64, fuel: Option<FuelProfile>) -> FleetUnit {
        FleetUnit {
            fleet_unit_id: id.to_string(),
            equipment_model: EquipmentModel {
                model_id: "GEN-500".to_string(),
                name: "500kW 机组".to_string(),
                rated_power_kw: 500.0,
                default_annual_hours: 1000.0,
                fuel,
            },
            quantity: 2,
            annual_operating_hours: None,
            duty_cycle,
            commissioning_rate_per_month: None,
        }
    }

    #[test]
    fn test_tier_selection_by_duty_cycle() {
        let profile = create_test_profile(FuelUnit::GallonsPerHour);
        assert_eq!(
            FuelCostEstimator::select_rate(&profile, 0.9),
            Some((LoadTier::Full, 30.0))
        );
        assert_eq!(
            FuelCostEstimator::select_rate(&profile, 0.6),
            Some((LoadTier::ThreeQuarter, 24.0))
        );
        assert_eq!(
            FuelCostEstimator::select_rate(&profile, 0.3),
            Some((LoadTier::Half, 16.0))
        );
    }

    #[test]
    fn test_tier_fallback_chain() {
        let profile = FuelProfile {
            unit: FuelUnit::GallonsPerHour,
            full_load_rate: Some(30.0),
            three_quarter_load_rate: None,
            half_load_rate: None,
        };
        assert_eq!(
            FuelCostEstimator::select_rate(&profile, 0.7),
            Some((LoadTier::Full, 30.0))
        );
        assert_eq!(
            FuelCostEstimator::select_rate(&profile, 0.2),
            Some((LoadTier::Full, 30.0))
        );

        let empty = FuelProfile {
            unit: FuelUnit::GallonsPerHour,
            full_load_rate: None,
            three_quarter_load_rate: None,
            half_load_rate: None,
        };
        assert_eq!(FuelCostEstimator::select_rate(&empty, 0.9), None);
    }

    #[test]
    fn test_gas_normalization() {
        assert!((FuelCostEstimator::normalize_rate(FuelUnit::CubicFeetPerHour, 500.0, 100.0) - 5.0).abs() < 1e-12);
        assert!(
            (FuelCostEstimator::normalize_rate(FuelUnit::CubicMetersPerHour, 100.0, 100.0)
                - 35.3147)
                .abs()
                < 1e-9
        );
        assert!(
            (FuelCostEstimator::normalize_rate(FuelUnit::LitersPerHour, LITERS_PER_GALLON, 100.0)
                - 1.0)
                .abs()
                < 1e-12
        );
    }

    #[test]
    fn test_annual_cost() {
        let estimator = FuelCostEstimator::new();
        let fleet = vec![create_test_unit(
            "FU-1",
            0.9,
            Some(create_test_profile(FuelUnit::GallonsPerHour)),
        )];
        let summary = estimator.estimate(&create_test_scenario(true), &fleet, &EngineConfig::default());

        // 30 gal/h × 1000 h × $4 × 2 台
        assert!(summary.enabled);
        assert!((summary.total_annual_cost - 240_000.0).abs() < 1e-6);
        assert_eq!(summary.rows[0].load_tier, LoadTier::Full);
    }

    #[test]
    fn test_missing_profile_reported() {
        let estimator = FuelCostEstimator::new();
        let fleet = vec![
            create_test_unit("FU-1", 0.9, Some(create_test_profile(FuelUnit::GallonsPerHour))),
            create_test_unit("FU-2", 0.9, None),
        ];
        let summary = estimator.estimate(&create_test_scenario(true), &fleet, &EngineConfig::default());
        assert_eq!(summary.rows.len(), 1);
        assert_eq!(summary.missing_profiles, vec!["FU-2".to_string()]);
    }

    #[test]
    fn test_disabled_flag_zeroes_everything() {
        let estimator = FuelCostEstimator::new();
        let fleet = vec![create_test_unit(
            "FU-1",
            0.9,
            Some(create_test_profile(FuelUnit::GallonsPerHour)),
        )];
        let summary =
            estimator.estimate(&create_test_scenario(false), &fleet, &EngineConfig::default());
        assert!(!summary.enabled);
        assert!(summary.rows.is_empty());
        assert_eq!(summary.total_annual_cost, 0.0);
    }
}
