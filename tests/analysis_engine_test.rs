// ==========================================
// 分析引擎集成测试
// ==========================================
// 测试目标: 通过 AnalysisOrchestrator 验证端到端计算口径
// ==========================================

mod test_helpers;

use fleet_tco::domain::{LoadTier, PriceCatalog, PriceListItem, ResolvedScenario, TaskStatus};
use fleet_tco::engine::{AnalysisOrchestrator, EngineError};
use fleet_tco::export::{self, ExportKind};
use fleet_tco::{logging, EngineConfig};
use test_helpers::{
    create_test_component, create_test_fleet_unit, create_test_resolved, create_test_task,
};

const EPS: f64 = 1e-6;

#[test]
fn test_full_scenario_task_breakdown() {
    logging::init_test();
    let result = AnalysisOrchestrator::default()
        .run(&create_test_resolved("S-FULL"))
        .unwrap();

    let costs = &result.task_costs;
    let oil = costs.rows.iter().find(|r| r.task_id == "OIL").unwrap();
    assert!((oil.services_per_year - 130.0).abs() < EPS);
    // 130 次 × (45 + 8 × 12)
    assert!((oil.parts_cost_per_year - 18_330.0).abs() < EPS);

    let monitoring = costs.rows.iter().find(|r| r.task_id == "MON").unwrap();
    assert_eq!(monitoring.status, TaskStatus::Automated);
    assert_eq!(monitoring.total_cost_per_year, 0.0);

    // 人工: 260h×100 + 60h×150 + 120h×200
    assert!((costs.total_labor_cost - 59_000.0).abs() < EPS);
    assert!((costs.total_labor_hours - 440.0).abs() < EPS);

    let pct_sum: f64 = costs.rows.iter().map(|r| r.labor_hours_pct).sum();
    assert!((pct_sum - 100.0).abs() < 1e-9);
}

#[test]
fn test_one_time_task_recognized_only_in_first_year() {
    let mut resolved = create_test_resolved("S-ONCE");
    let mut commissioning = create_test_task("COMM", 2.0, "basic");
    commissioning.is_one_time = true;
    resolved.pm_tasks = vec![commissioning];
    resolved.components.clear();

    let result = AnalysisOrchestrator::default().run(&resolved).unwrap();

    assert!((result.task_costs.rows[0].labor_cost_per_year - 2_000.0).abs() < EPS);
    assert!((result.projection[0].total_cost - 2_000.0).abs() < EPS);
    assert!(result.projection[1].total_cost.abs() < EPS);
    assert!((result.summary.total_nominal - 2_000.0).abs() < EPS);
}

#[test]
fn test_one_time_cost_netted_from_later_years() {
    let result = AnalysisOrchestrator::default()
        .run(&create_test_resolved("S-NET"))
        .unwrap();

    // 一次性调试: 10 台 × 12h × 200
    let year1 = &result.projection[0];
    let year2 = &result.projection[1];
    assert!((year1.maintenance_cost - year2.maintenance_cost).abs() < EPS);
    assert!((year2.one_time_adjustment + 24_000.0).abs() < EPS);
    assert!((year1.total_cost - year2.total_cost - 24_000.0).abs() < EPS);
}

#[test]
fn test_replacement_schedule_boundary_through_orchestrator() {
    let mut resolved = create_test_resolved("S-BOUNDARY");
    resolved.scenario.analysis_period_years = 20;
    resolved.fleet = vec![create_test_fleet_unit("FU-1", 1, 8760.0)];
    resolved.pm_tasks.clear();
    resolved.components = vec![create_test_component("C-8760", 8760.0)];

    let result = AnalysisOrchestrator::default().run(&resolved).unwrap();

    assert_eq!(result.replacements.events.len(), 19);
    assert_eq!(result.replacements.events.last().unwrap().year, 19);
    assert_eq!(result.projection[19].replacement_cost, 0.0);
}

#[test]
fn test_replacements_flow_into_projection() {
    let result = AnalysisOrchestrator::default()
        .run(&create_test_resolved("S-REPL"))
        .unwrap();

    // 20000h / 6500h: 第 4、7、10 年, 两组机组各 3 次
    assert_eq!(result.replacements.events.len(), 6);
    let years: Vec<u32> = result.replacements.cost_by_year.keys().copied().collect();
    assert_eq!(years, vec![4, 7, 10]);

    // (8h × 150 + 6500) × 10 台
    assert!((result.projection[3].replacement_cost - 77_000.0).abs() < EPS);
    assert_eq!(result.projection[2].replacement_cost, 0.0);
}

#[test]
fn test_zero_rates_nominal_equals_npv() {
    let mut resolved = create_test_resolved("S-ZERO");
    resolved.pm_tasks.retain(|t| !t.is_one_time);
    resolved.components.clear();
    resolved.scenario.include_fuel = true;
    resolved.scenario.fuel_price_per_unit = 3.5;

    let result = AnalysisOrchestrator::default().run(&resolved).unwrap();
    let summary = &result.summary;

    assert!(summary.annual_fuel_cost > 0.0);
    assert!((summary.total_nominal - 10.0 * summary.annual_total_cost).abs() < 1e-4);
    assert!((summary.total_npv - summary.total_nominal).abs() < 1e-4);
}

#[test]
fn test_repeated_runs_are_bit_identical() {
    let mut resolved = create_test_resolved("S-DET");
    resolved.scenario.discount_rate_pct = 7.5;
    resolved.scenario.inflation_rate_pct = 2.75;
    resolved.scenario.include_downtime = true;
    resolved.scenario.downtime_cost_per_hour = 180.0;

    let orchestrator = AnalysisOrchestrator::default();
    let first = orchestrator.run(&resolved).unwrap();
    let second = orchestrator.run(&resolved).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_configuration_errors_reported_before_computation() {
    let orchestrator = AnalysisOrchestrator::default();

    let mut no_schedule = create_test_resolved("S-NOPM");
    no_schedule.scenario.pm_schedule_id = None;
    assert_eq!(
        orchestrator.run(&no_schedule).unwrap_err(),
        EngineError::MissingPmSchedule("S-NOPM".to_string())
    );

    let mut bad_skill = create_test_resolved("S-SKILL");
    bad_skill.pm_tasks[0].skill_level = "wizard".to_string();
    assert_eq!(
        orchestrator.run(&bad_skill).unwrap_err(),
        EngineError::UnrecognizedSkillTier {
            task_id: "OIL".to_string(),
            value: "wizard".to_string(),
        }
    );
}

#[test]
fn test_b10_basis_from_config() {
    let config = EngineConfig {
        replacement_basis: fleet_tco::ReplacementBasis::B10Life,
        ..EngineConfig::default()
    };
    let resolved = create_test_resolved("S-B10");

    let mean_basis = AnalysisOrchestrator::default().run(&resolved).unwrap();
    let b10_basis = AnalysisOrchestrator::new(config).run(&resolved).unwrap();

    assert!(b10_basis.replacements.events.len() > mean_basis.replacements.events.len());
    assert!(b10_basis.summary.total_nominal > mean_basis.summary.total_nominal);
}

#[test]
fn test_scenario_from_json_document() {
    let json = r#"
    {
        "scenario": {
            "scenario_id": "J1",
            "name": "JSON 方案",
            "fleet_id": "F1",
            "pm_schedule_id": "PM1",
            "price_list_id": "PL1",
            "analysis_period_years": 5,
            "labor_rates": { "rates": { "BASIC": 90.0, "SPECIALIST": 140.0, "ENGINEER": 190.0 } },
            "working_days_per_year": 250,
            "hours_per_day": 8,
            "target_utilization_pct": 80,
            "parts_discount_pct": 5,
            "overhead_markup_pct": 10,
            "discount_rate_pct": 7,
            "inflation_rate_pct": 2.5,
            "fuel_price_per_unit": 3.2,
            "downtime_cost_per_hour": 150,
            "include_fuel": true,
            "include_downtime": true
        },
        "fleet": [
            {
                "fleet_unit_id": "FU-1",
                "equipment_model": {
                    "model_id": "GEN-500",
                    "name": "500kW",
                    "rated_power_kw": 500,
                    "default_annual_hours": 3000,
                    "fuel": {
                        "unit": "LITERS_PER_HOUR",
                        "full_load_rate": 130,
                        "three_quarter_load_rate": 100,
                        "half_load_rate": null
                    }
                },
                "quantity": 3,
                "duty_cycle": 0.5,
                "commissioning_rate_per_month": 1
            }
        ],
        "pm_tasks": [
            {
                "task_id": "T1",
                "name": "换机油",
                "interval_hours": 250,
                "labor_hours_per_service": 1.5,
                "skill_level": "technician",
                "parts": [ { "part_number": "OF-1", "quantity": 1 } ]
            }
        ],
        "price_catalog": {
            "price_list_id": "PL1",
            "items": { "OF-1": { "part_number": "OF-1", "description": null, "unit_price": 30 } }
        }
    }
    "#;

    let resolved: ResolvedScenario = serde_json::from_str(json).unwrap();
    assert!(resolved.components.is_empty());
    assert!(resolved.pm_tasks[0].enabled);

    let result = AnalysisOrchestrator::default().run(&resolved).unwrap();

    // 负载率 0.5, 无 50% 档 → 回退 75% 档
    assert_eq!(result.fuel.rows[0].load_tier, LoadTier::ThreeQuarter);
    assert!(result.downtime.enabled);
    assert!(result.unpriced_parts.is_empty());

    // 每月投运 1 台, 共 3 台
    assert_eq!(result.staffing.ramp.len(), 12);
    assert_eq!(result.staffing.ramp[0].units_active, 1.0);
    assert_eq!(result.staffing.ramp[2].units_active, 3.0);
}

#[test]
fn test_csv_export_of_projection_and_tasks() {
    let result = AnalysisOrchestrator::default()
        .run(&create_test_resolved("S-CSV"))
        .unwrap();

    let projection_csv = export::to_csv_string(&result, ExportKind::Projection).unwrap();
    let lines: Vec<&str> = projection_csv.lines().collect();
    assert_eq!(lines.len(), 11);
    assert!(lines[0].starts_with("year,inflation_multiplier"));

    let tasks_csv = export::to_csv_string(&result, ExportKind::TaskCosts).unwrap();
    assert_eq!(tasks_csv.lines().count(), 5);
    assert!(tasks_csv.contains("AUTOMATED"));

    let replacements_csv = export::to_csv_string(&result, ExportKind::Replacements).unwrap();
    assert_eq!(replacements_csv.lines().count(), 7);
}

#[test]
fn test_csv_export_to_file() {
    let result = AnalysisOrchestrator::default()
        .run(&create_test_resolved("S-FILE"))
        .unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("replacements.csv");

    export::write_csv_file(&result, ExportKind::Replacements, &path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        written,
        export::to_csv_string(&result, ExportKind::Replacements).unwrap()
    );
    assert!(export::write_csv_file(&result, ExportKind::Projection, dir.path()).is_err());
}

#[test]
fn test_negative_prices_and_quantities_rejected() {
    let orchestrator = AnalysisOrchestrator::default();

    let mut negative_price = create_test_resolved("S-PRICE");
    let mut items: Vec<PriceListItem> = negative_price.price_catalog.items().cloned().collect();
    for item in items.iter_mut().filter(|i| i.part_number == "OF-1000") {
        item.unit_price = Some(-45.0);
    }
    negative_price.price_catalog = PriceCatalog::new("PL-2024", items);
    match orchestrator.run(&negative_price).unwrap_err() {
        EngineError::InvalidParameter { field, .. } => {
            assert_eq!(field, "price_catalog[OF-1000].unit_price")
        }
        other => panic!("应为参数错误, 实际 {:?}", other),
    }

    let mut negative_quantity = create_test_resolved("S-QTY");
    negative_quantity.pm_tasks[0].parts[1].quantity = -100.0;
    match orchestrator.run(&negative_quantity).unwrap_err() {
        EngineError::InvalidParameter { field, .. } => {
            assert_eq!(field, "pm_tasks[OIL].parts[1].quantity")
        }
        other => panic!("应为参数错误, 实际 {:?}", other),
    }

    let mut nan_power = create_test_resolved("S-KW");
    nan_power.fleet[1].equipment_model.rated_power_kw = f64::NAN;
    assert!(orchestrator.run(&nan_power).unwrap_err().is_configuration());
}

#[test]
fn test_tiny_commissioning_rate_caps_ramp() {
    let mut resolved = create_test_resolved("S-TRICKLE");
    resolved.fleet[0].commissioning_rate_per_month = Some(1e-9);

    let result = AnalysisOrchestrator::default().run(&resolved).unwrap();
    assert_eq!(result.staffing.ramp.len(), 120);
    assert!(result.projection.iter().all(|row| row.total_cost.is_finite()));
}
