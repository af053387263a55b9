// ==========================================
// 车队 TCO 分析系统 - 领域类型定义
// ==========================================
// 职责: 闭合枚举 (技能等级/周期类型/任务状态/燃料单位/成本类别/对比指标)
// 红线: 未识别的技能等级必须报错, 不允许静默回退
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ==========================================
// 技能等级 (Skill Tier)
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与边界数据一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkillTier {
    Basic,      // 基础/技术员
    Specialist, // 专家
    Engineer,   // 工程师
}

impl SkillTier {
    pub const ALL: [SkillTier; 3] = [SkillTier::Basic, SkillTier::Specialist, SkillTier::Engineer];
}

impl fmt::Display for SkillTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkillTier::Basic => write!(f, "BASIC"),
            SkillTier::Specialist => write!(f, "SPECIALIST"),
            SkillTier::Engineer => write!(f, "ENGINEER"),
        }
    }
}

/// 未识别的技能等级字符串
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("未识别的技能等级: '{0}'")]
pub struct UnknownSkillTier(pub String);

impl FromStr for SkillTier {
    type Err = UnknownSkillTier;

    /// "technician" 是 basic 的别名, 其余值一律报错
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" | "technician" => Ok(SkillTier::Basic),
            "specialist" => Ok(SkillTier::Specialist),
            "engineer" => Ok(SkillTier::Engineer),
            _ => Err(UnknownSkillTier(s.to_string())),
        }
    }
}

// ==========================================
// 周期类型 (Recurrence Kind)
// ==========================================
// 优先级: 小时 > 日历月 > 一次性
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", tag = "kind", content = "interval")]
pub enum RecurrenceKind {
    Hours(f64),  // 按运行小时
    Months(f64), // 按日历月
    OneTime,     // 一次性
    Unscheduled, // 无有效周期
}

impl fmt::Display for RecurrenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecurrenceKind::Hours(h) => write!(f, "every {} h", h),
            RecurrenceKind::Months(m) => write!(f, "every {} mo", m),
            RecurrenceKind::OneTime => write!(f, "one-time"),
            RecurrenceKind::Unscheduled => write!(f, "unscheduled"),
        }
    }
}

// ==========================================
// 任务状态 (Task Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Active,      // 计入成本
    Disabled,    // 已停用
    Automated,   // 自动化 (无人工)
    Unscheduled, // 无有效周期
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Active => write!(f, "ACTIVE"),
            TaskStatus::Disabled => write!(f, "DISABLED"),
            TaskStatus::Automated => write!(f, "AUTOMATED"),
            TaskStatus::Unscheduled => write!(f, "UNSCHEDULED"),
        }
    }
}

// ==========================================
// 燃料消耗单位 (Fuel Unit)
// ==========================================
// 液体燃料折算为加仑, 气体燃料折算为 therm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FuelUnit {
    GallonsPerHour,
    LitersPerHour,
    CubicFeetPerHour,
    CubicMetersPerHour,
    ThermsPerHour,
}

impl FuelUnit {
    pub fn is_gas(&self) -> bool {
        matches!(
            self,
            FuelUnit::CubicFeetPerHour | FuelUnit::CubicMetersPerHour | FuelUnit::ThermsPerHour
        )
    }
}

impl fmt::Display for FuelUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FuelUnit::GallonsPerHour => write!(f, "gal/h"),
            FuelUnit::LitersPerHour => write!(f, "L/h"),
            FuelUnit::CubicFeetPerHour => write!(f, "ft3/h"),
            FuelUnit::CubicMetersPerHour => write!(f, "m3/h"),
            FuelUnit::ThermsPerHour => write!(f, "therm/h"),
        }
    }
}

// ==========================================
// 负载档位 (Load Tier)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoadTier {
    Full,
    ThreeQuarter,
    Half,
}

// ==========================================
// 成本类别 (Cost Category)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CostCategory {
    Labor,
    Parts,
    Overhead,
    Fuel,
    Downtime,
    Replacements,
}

impl fmt::Display for CostCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostCategory::Labor => write!(f, "LABOR"),
            CostCategory::Parts => write!(f, "PARTS"),
            CostCategory::Overhead => write!(f, "OVERHEAD"),
            CostCategory::Fuel => write!(f, "FUEL"),
            CostCategory::Downtime => write!(f, "DOWNTIME"),
            CostCategory::Replacements => write!(f, "REPLACEMENTS"),
        }
    }
}

// ==========================================
// 对比指标 (Comparison Metric)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMetric {
    TotalNpv,
    TotalNominal,
    AnnualMaintenanceCost,
    AnnualTotalCost,
    CostPerKwh,
    CostPerOperatingHour,
    TechniciansNeeded,
    TechnicianUtilization,
}

impl ComparisonMetric {
    pub const ALL: [ComparisonMetric; 8] = [
        ComparisonMetric::TotalNpv,
        ComparisonMetric::TotalNominal,
        ComparisonMetric::AnnualMaintenanceCost,
        ComparisonMetric::AnnualTotalCost,
        ComparisonMetric::CostPerKwh,
        ComparisonMetric::CostPerOperatingHour,
        ComparisonMetric::TechniciansNeeded,
        ComparisonMetric::TechnicianUtilization,
    ];

    /// 利用率类指标越高越好, 其余越低越好
    pub fn higher_is_better(&self) -> bool {
        matches!(self, ComparisonMetric::TechnicianUtilization)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("未知对比指标: '{0}'")]
pub struct UnknownComparisonMetric(pub String);

impl FromStr for ComparisonMetric {
    type Err = UnknownComparisonMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        ComparisonMetric::ALL
            .into_iter()
            .find(|metric| metric.to_string() == key)
            .ok_or_else(|| UnknownComparisonMetric(s.to_string()))
    }
}

impl fmt::Display for ComparisonMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ComparisonMetric::TotalNpv => "total_npv",
            ComparisonMetric::TotalNominal => "total_nominal",
            ComparisonMetric::AnnualMaintenanceCost => "annual_maintenance_cost",
            ComparisonMetric::AnnualTotalCost => "annual_total_cost",
            ComparisonMetric::CostPerKwh => "cost_per_kwh",
            ComparisonMetric::CostPerOperatingHour => "cost_per_operating_hour",
            ComparisonMetric::TechniciansNeeded => "technicians_needed",
            ComparisonMetric::TechnicianUtilization => "technician_utilization",
        };
        write!(f, "{}", s)
    }
}

// ==========================================
// 更换寿命口径 (Replacement Basis)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReplacementBasis {
    #[default]
    MeanLife, // 平均寿命
    B10Life,  // 10% 累计失效寿命
}
