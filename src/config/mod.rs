// ==========================================
// 车队 TCO 分析系统 - 配置层
// ==========================================
// 职责: 引擎参数管理, 支持 config_kv 覆写
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod engine_config;
pub mod engine_config_trait;

// 重导出核心配置
pub use config_manager::{config_keys, ConfigManager};
pub use engine_config::{EngineConfig, MIN_INTERVAL_SEARCH_STEPS};
pub use engine_config_trait::EngineConfigReader;
