// ==========================================
// 车队 TCO 分析系统 - 引擎参数
// ==========================================
// 职责: 集中所有可调参数及其默认值
// 存储: config_kv 表 (见 ConfigManager), 缺省时使用 Default
// ==========================================

use crate::domain::component::DEFAULT_WEIBULL_SHAPE;
use crate::domain::types::ReplacementBasis;
use serde::{Deserialize, Serialize};

/// 可靠性搜索的最小步数
pub const MIN_INTERVAL_SEARCH_STEPS: u32 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// 人员需求安全系数 (非生产时间 + 积压)
    pub staffing_safety_factor: f64,
    pub default_weibull_shape: f64,
    pub curve_points: u32,
    pub interval_search_steps: u32,
    pub unplanned_cost_multiplier: f64,
    pub min_ramp_months: u32,
    pub max_ramp_months: u32,
    pub ramp_tail_months: u32,
    pub cubic_feet_per_therm: f64,
    pub replacement_basis: ReplacementBasis,
    pub analysis_timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            staffing_safety_factor: 1.15,
            default_weibull_shape: DEFAULT_WEIBULL_SHAPE,
            curve_points: 50,
            interval_search_steps: 200,
            unplanned_cost_multiplier: 3.0,
            min_ramp_months: 12,
            max_ramp_months: 120,
            ramp_tail_months: 3,
            cubic_feet_per_therm: 100.0,
            replacement_basis: ReplacementBasis::MeanLife,
            analysis_timeout_ms: 30_000,
        }
    }
}

impl EngineConfig {
    /// 实际搜索步数 (不少于 100)
    pub fn effective_search_steps(&self) -> u32 {
        self.interval_search_steps.max(MIN_INTERVAL_SEARCH_STEPS)
    }
}
