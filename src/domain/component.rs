// ==========================================
// 车队 TCO 分析系统 - 部件寿命模型
// ==========================================

use serde::{Deserialize, Serialize};

/// 未给出形状参数时的默认 Weibull 形状
pub const DEFAULT_WEIBULL_SHAPE: f64 = 2.5;

// ==========================================
// ComponentLifecycle - 易损部件寿命记录 (按设备型号)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentLifecycle {
    pub component_id: String,
    pub equipment_model_id: String,
    pub component_name: String,
    #[serde(default)]
    pub part_number: Option<String>,
    pub mean_life_hours: f64,
    #[serde(default)]
    pub min_life_hours: Option<f64>,
    #[serde(default)]
    pub max_life_hours: Option<f64>,
    pub replacement_labor_hours: f64,
    #[serde(default)]
    pub weibull_shape: Option<f64>,
    #[serde(default)]
    pub weibull_scale: Option<f64>,
}

impl ComponentLifecycle {
    pub fn shape_or(&self, default_shape: f64) -> f64 {
        self.weibull_shape.unwrap_or(default_shape)
    }
}
