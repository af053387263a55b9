// ==========================================
// 车队 TCO 分析系统 - 预防性维护任务
// ==========================================

use crate::domain::types::RecurrenceKind;
use serde::{Deserialize, Serialize};

// ==========================================
// TaskPart - 任务备件
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskPart {
    pub part_number: Option<String>,
    pub quantity: f64,
    /// 可选备件不计入基线成本
    #[serde(default)]
    pub is_optional: bool,
}

// ==========================================
// PmTask - 预防性维护任务
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PmTask {
    pub task_id: String,
    pub name: String,
    #[serde(default)]
    pub interval_hours: Option<f64>,
    #[serde(default)]
    pub interval_months: Option<f64>,
    #[serde(default)]
    pub is_one_time: bool,
    pub labor_hours_per_service: f64,
    /// 原始技能等级字符串, 由校验阶段解析为 SkillTier
    pub skill_level: String,
    #[serde(default)]
    pub is_automated: bool,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub is_locked: bool,
    /// 单次服务停机小时 (缺省取人工小时)
    #[serde(default)]
    pub downtime_hours_per_service: Option<f64>,
    #[serde(default)]
    pub parts: Vec<TaskPart>,
}

fn default_enabled() -> bool {
    true
}

impl PmTask {
    /// 解析周期规则: 小时优先, 其次日历月, 再次一次性
    pub fn recurrence(&self) -> RecurrenceKind {
        match (self.interval_hours, self.interval_months) {
            (Some(h), _) if h > 0.0 => RecurrenceKind::Hours(h),
            (_, Some(m)) if m > 0.0 => RecurrenceKind::Months(m),
            _ if self.is_one_time => RecurrenceKind::OneTime,
            _ => RecurrenceKind::Unscheduled,
        }
    }

    pub fn downtime_hours(&self) -> f64 {
        self.downtime_hours_per_service
            .unwrap_or(self.labor_hours_per_service)
    }
}
