// ==========================================
// 车队 TCO 分析系统 - 车队领域模型
// ==========================================

use crate::domain::types::FuelUnit;
use serde::{Deserialize, Serialize};

// ==========================================
// FuelProfile - 燃料消耗档位
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelProfile {
    pub unit: FuelUnit,
    pub full_load_rate: Option<f64>,
    pub three_quarter_load_rate: Option<f64>,
    pub half_load_rate: Option<f64>,
}

// ==========================================
// EquipmentModel - 设备型号 (边界已关联)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentModel {
    pub model_id: String,
    pub name: String,
    pub rated_power_kw: f64,
    /// 使用等级默认年运行小时
    pub default_annual_hours: f64,
    #[serde(default)]
    pub fuel: Option<FuelProfile>,
}

// ==========================================
// FleetUnit - 同型号机组组
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetUnit {
    pub fleet_unit_id: String,
    pub equipment_model: EquipmentModel,
    pub quantity: u32,
    #[serde(default)]
    pub annual_operating_hours: Option<f64>,
    pub duty_cycle: f64,
    /// 每月投运台数 (None 或 <=0 表示首月全部投运)
    #[serde(default)]
    pub commissioning_rate_per_month: Option<f64>,
}

impl FleetUnit {
    /// 年运行小时: 显式值优先, 否则取型号使用等级默认值
    pub fn effective_annual_hours(&self) -> f64 {
        self.annual_operating_hours
            .unwrap_or(self.equipment_model.default_annual_hours)
    }

    /// 投运完成所需月数 (极小投运速率时饱和到 u32::MAX)
    pub fn commissioning_months(&self) -> u32 {
        match self.commissioning_rate_per_month {
            Some(rate) if rate > 0.0 => (self.quantity as f64 / rate).ceil() as u32,
            _ => 1,
        }
    }

    /// 第 month 个月末累计投运台数 (month 从 1 开始)
    pub fn units_active_at(&self, month: u32) -> f64 {
        let quantity = self.quantity as f64;
        match self.commissioning_rate_per_month {
            Some(rate) if rate > 0.0 => (rate * month as f64).min(quantity),
            _ => quantity,
        }
    }
}
