// ==========================================
// 车队 TCO 分析系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供 CLI / 上层服务调用
// ==========================================

pub mod analysis_api;
pub mod error;

// 重导出核心类型
pub use analysis_api::{AnalysisApi, MIN_COMPARISON_SCENARIOS};
pub use error::{ApiError, ApiResult};
