// ==========================================
// 车队 TCO 分析系统 - 方案领域模型
// ==========================================
// 职责: 分析单元 (Scenario) 及其引用的已解析数据集合
// 红线: 不含计算逻辑, 校验由 engine::validation 负责
// ==========================================

use crate::domain::component::ComponentLifecycle;
use crate::domain::fleet::FleetUnit;
use crate::domain::pm_task::PmTask;
use crate::domain::price::PriceCatalog;
use crate::domain::types::SkillTier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// LaborRates - 技能等级人工费率表
// ==========================================
// 显式查找结构, 由方案持有并传入引擎
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaborRates {
    rates: BTreeMap<SkillTier, f64>,
}

impl LaborRates {
    pub fn new(basic: f64, specialist: f64, engineer: f64) -> Self {
        let mut rates = BTreeMap::new();
        rates.insert(SkillTier::Basic, basic);
        rates.insert(SkillTier::Specialist, specialist);
        rates.insert(SkillTier::Engineer, engineer);
        Self { rates }
    }

    /// 查询费率 (缺失等级按 0 处理)
    pub fn rate(&self, tier: SkillTier) -> f64 {
        self.rates.get(&tier).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SkillTier, f64)> + '_ {
        self.rates.iter().map(|(k, v)| (*k, *v))
    }
}

// ==========================================
// Scenario - 分析方案
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub scenario_id: String,
    pub name: String,

    // ===== 引用 (可运行分析必须全部存在) =====
    pub fleet_id: Option<String>,
    pub pm_schedule_id: Option<String>,
    pub price_list_id: Option<String>,

    // ===== 分析周期 =====
    pub analysis_period_years: u32,

    // ===== 人工 =====
    pub labor_rates: LaborRates,
    pub working_days_per_year: f64,
    pub hours_per_day: f64,
    pub target_utilization_pct: f64, // (0, 100]

    // ===== 加价与折扣 =====
    pub parts_discount_pct: f64,  // [0, 100]
    pub overhead_markup_pct: f64, // [0, 100]

    // ===== 财务 =====
    pub discount_rate_pct: f64,  // 年折现率 (可为 0)
    pub inflation_rate_pct: f64, // 年通胀率 (可为 0)

    // ===== 燃料与停机 =====
    pub fuel_price_per_unit: f64, // 液体按加仑, 气体按 therm
    pub downtime_cost_per_hour: f64,
    pub include_fuel: bool,
    pub include_downtime: bool,
}

impl Scenario {
    pub fn utilization_fraction(&self) -> f64 {
        self.target_utilization_pct / 100.0
    }

    pub fn parts_discount_fraction(&self) -> f64 {
        self.parts_discount_pct / 100.0
    }

    pub fn overhead_fraction(&self) -> f64 {
        self.overhead_markup_pct / 100.0
    }

    pub fn discount_rate(&self) -> f64 {
        self.discount_rate_pct / 100.0
    }

    pub fn inflation_rate(&self) -> f64 {
        self.inflation_rate_pct / 100.0
    }
}

// ==========================================
// ResolvedScenario - 已解析的分析输入
// ==========================================
// 由数据访问边界组装, 引擎只读
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedScenario {
    pub scenario: Scenario,
    #[serde(default)]
    pub fleet: Vec<FleetUnit>,
    #[serde(default)]
    pub pm_tasks: Vec<PmTask>,
    #[serde(default)]
    pub price_catalog: PriceCatalog,
    #[serde(default)]
    pub components: Vec<ComponentLifecycle>,
}

impl ResolvedScenario {
    pub fn scenario_id(&self) -> &str {
        &self.scenario.scenario_id
    }

    /// 车队总台数
    pub fn total_units(&self) -> u32 {
        self.fleet.iter().map(|u| u.quantity).sum()
    }

    /// 车队年运行小时合计 (Σ 台数 × 年小时)
    pub fn total_annual_operating_hours(&self) -> f64 {
        self.fleet
            .iter()
            .map(|u| u.quantity as f64 * u.effective_annual_hours())
            .sum()
    }

    /// 台数加权平均年运行小时
    pub fn avg_annual_hours(&self) -> f64 {
        let units = self.total_units();
        if units == 0 {
            return 0.0;
        }
        self.total_annual_operating_hours() / units as f64
    }

    /// 车队额定功率合计 (kW)
    pub fn total_kw(&self) -> f64 {
        self.fleet
            .iter()
            .map(|u| u.quantity as f64 * u.equipment_model.rated_power_kw)
            .sum()
    }
}
