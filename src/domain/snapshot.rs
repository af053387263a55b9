// ==========================================
// 车队 TCO 分析系统 - 分析快照
// ==========================================
// 结果本身不含时间戳; 快照 ID 与创建时间只在存储边界生成
// ==========================================

use crate::domain::result::AnalysisResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSnapshot {
    pub snapshot_id: String,
    pub scenario_id: String,
    pub created_at: DateTime<Utc>,
    pub result: AnalysisResult,
}

impl AnalysisSnapshot {
    /// 以当前时间和随机 ID 包装分析结果
    pub fn new(result: AnalysisResult) -> Self {
        Self {
            snapshot_id: Uuid::new_v4().to_string(),
            scenario_id: result.scenario_id.clone(),
            created_at: Utc::now(),
            result,
        }
    }
}
