// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供临时数据库与测试方案构造
// ==========================================
#![allow(dead_code)]

use fleet_tco::domain::{
    ComponentLifecycle, EquipmentModel, FleetUnit, FuelProfile, LaborRates, PmTask,
    PriceCatalog, PriceListItem, ResolvedScenario, Scenario, TaskPart,
};
use fleet_tco::FuelUnit;
use std::error::Error;
use tempfile::NamedTempFile;

/// 创建临时测试数据库文件
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径不是 UTF-8")?
        .to_string();
    Ok((temp_file, db_path))
}

/// 零利率、不含燃料/停机的基础方案
pub fn create_test_scenario_record(scenario_id: &str) -> Scenario {
    Scenario {
        scenario_id: scenario_id.to_string(),
        name: format!("方案-{}", scenario_id),
        fleet_id: Some("FLEET-1".to_string()),
        pm_schedule_id: Some("PM-STD".to_string()),
        price_list_id: Some("PL-2024".to_string()),
        analysis_period_years: 10,
        labor_rates: LaborRates::new(100.0, 150.0, 200.0),
        working_days_per_year: 250.0,
        hours_per_day: 8.0,
        target_utilization_pct: 75.0,
        parts_discount_pct: 0.0,
        overhead_markup_pct: 0.0,
        discount_rate_pct: 0.0,
        inflation_rate_pct: 0.0,
        fuel_price_per_unit: 0.0,
        downtime_cost_per_hour: 0.0,
        include_fuel: false,
        include_downtime: false,
    }
}

pub fn create_test_fleet_unit(id: &str, quantity: u32, annual_hours: f64) -> FleetUnit {
    FleetUnit {
        fleet_unit_id: id.to_string(),
        equipment_model: EquipmentModel {
            model_id: "GEN-1000".to_string(),
            name: "1MW 柴油发电机组".to_string(),
            rated_power_kw: 1000.0,
            default_annual_hours: 4000.0,
            fuel: Some(FuelProfile {
                unit: FuelUnit::GallonsPerHour,
                full_load_rate: Some(70.0),
                three_quarter_load_rate: Some(54.0),
                half_load_rate: Some(37.0),
            }),
        },
        quantity,
        annual_operating_hours: Some(annual_hours),
        duty_cycle: 0.75,
        commissioning_rate_per_month: None,
    }
}

pub fn create_test_task(id: &str, labor_hours: f64, skill: &str) -> PmTask {
    PmTask {
        task_id: id.to_string(),
        name: format!("任务-{}", id),
        interval_hours: None,
        interval_months: None,
        is_one_time: false,
        labor_hours_per_service: labor_hours,
        skill_level: skill.to_string(),
        is_automated: false,
        enabled: true,
        is_locked: false,
        downtime_hours_per_service: None,
        parts: vec![],
    }
}

pub fn create_test_catalog() -> PriceCatalog {
    PriceCatalog::new(
        "PL-2024",
        vec![
            PriceListItem {
                part_number: "OF-1000".to_string(),
                description: Some("机油滤芯".to_string()),
                unit_price: Some(45.0),
            },
            PriceListItem {
                part_number: "OIL-15W40".to_string(),
                description: Some("机油 (加仑)".to_string()),
                unit_price: Some(12.0),
            },
            PriceListItem {
                part_number: "TC-1000".to_string(),
                description: Some("涡轮增压器".to_string()),
                unit_price: Some(6500.0),
            },
        ],
    )
}

pub fn create_test_component(id: &str, mean_life: f64) -> ComponentLifecycle {
    ComponentLifecycle {
        component_id: id.to_string(),
        equipment_model_id: "GEN-1000".to_string(),
        component_name: format!("部件-{}", id),
        part_number: Some("TC-1000".to_string()),
        mean_life_hours: mean_life,
        min_life_hours: None,
        max_life_hours: None,
        replacement_labor_hours: 8.0,
        weibull_shape: Some(2.5),
        weibull_scale: None,
    }
}

/// 完整测试方案: 2 组机组 (共 10 台, 6500h/年),
/// 含按小时、按月、一次性、自动化任务, 以及一个部件寿命记录
pub fn create_test_resolved(scenario_id: &str) -> ResolvedScenario {
    let mut oil_change = create_test_task("OIL", 2.0, "technician");
    oil_change.interval_hours = Some(500.0);
    oil_change.parts = vec![
        TaskPart {
            part_number: Some("OF-1000".to_string()),
            quantity: 1.0,
            is_optional: false,
        },
        TaskPart {
            part_number: Some("OIL-15W40".to_string()),
            quantity: 8.0,
            is_optional: false,
        },
    ];

    let mut annual_inspection = create_test_task("INSP", 6.0, "specialist");
    annual_inspection.interval_months = Some(12.0);

    let mut commissioning = create_test_task("COMM", 12.0, "engineer");
    commissioning.is_one_time = true;

    let mut remote_monitoring = create_test_task("MON", 1.0, "basic");
    remote_monitoring.interval_months = Some(1.0);
    remote_monitoring.is_automated = true;

    ResolvedScenario {
        scenario: create_test_scenario_record(scenario_id),
        fleet: vec![
            create_test_fleet_unit("FU-A", 6, 6500.0),
            create_test_fleet_unit("FU-B", 4, 6500.0),
        ],
        pm_tasks: vec![oil_change, annual_inspection, commissioning, remote_monitoring],
        price_catalog: create_test_catalog(),
        components: vec![create_test_component("TURBO", 20000.0)],
    }
}
