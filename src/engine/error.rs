// ==========================================
// 车队 TCO 分析系统 - 引擎层错误类型
// ==========================================
// 分类:
// - 配置错误: 计算开始前报告, 不得静默归零
// - 可靠性域错误: 只影响单个部件, 由编排器降级为告警
// ==========================================

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    // ===== 配置错误 =====
    #[error("方案未关联车队: scenario_id={0}")]
    MissingFleet(String),

    #[error("方案未关联维护计划: scenario_id={0}")]
    MissingPmSchedule(String),

    #[error("方案未关联价格目录: scenario_id={0}")]
    MissingPriceCatalog(String),

    #[error("车队为空: scenario_id={0}")]
    EmptyFleet(String),

    #[error("参数无效 (field={field}): {message}")]
    InvalidParameter { field: String, message: String },

    #[error("未识别的技能等级: task_id={task_id}, value='{value}'")]
    UnrecognizedSkillTier { task_id: String, value: String },

    // ===== 可靠性域错误 =====
    #[error("Weibull 参数无效: {parameter}={value} (必须 > 0)")]
    InvalidWeibull { parameter: String, value: f64 },
}

impl EngineError {
    pub fn invalid_parameter(field: &str, message: impl Into<String>) -> Self {
        EngineError::InvalidParameter {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// 是否为配置类错误 (需在计算前拦截)
    pub fn is_configuration(&self) -> bool {
        !matches!(self, EngineError::InvalidWeibull { .. })
    }
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
