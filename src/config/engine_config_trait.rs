// ==========================================
// 车队 TCO 分析系统 - 引擎参数读取 Trait
// ==========================================
// 职责: 定义引擎所需的参数读取接口（不包含实现）
// 实现者: ConfigManager（config_kv 表）, EngineConfig（静态参数）
// ==========================================

use crate::config::engine_config::EngineConfig;
use async_trait::async_trait;
use std::error::Error;

#[async_trait]
pub trait EngineConfigReader: Send + Sync {
    /// 读取完整引擎参数
    ///
    /// # 返回
    /// - EngineConfig: 未配置的项使用默认值
    async fn load_engine_config(&self) -> Result<EngineConfig, Box<dyn Error + Send + Sync>>;
}

/// 静态参数直接作为读取器 (测试/嵌入场景)
#[async_trait]
impl EngineConfigReader for EngineConfig {
    async fn load_engine_config(&self) -> Result<EngineConfig, Box<dyn Error + Send + Sync>> {
        Ok(self.clone())
    }
}
