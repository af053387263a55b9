// ==========================================
// 车队 TCO 分析系统 - 分析 API
// ==========================================
// 职责: 方案解析 → 引擎计算 → 快照持久化; 多方案并发对比; CSV 导出
// 并发: 方案解析用 join_all 并发, 纯计算放入 spawn_blocking,
//       每个方案单独受 analysis_timeout_ms 约束
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{EngineConfig, EngineConfigReader};
use crate::domain::result::{AnalysisResult, ComparisonResult, ScenarioFailure};
use crate::domain::scenario::ResolvedScenario;
use crate::domain::snapshot::AnalysisSnapshot;
use crate::domain::types::ComparisonMetric;
use crate::engine::AnalysisOrchestrator;
use crate::export::{self, ExportKind};
use crate::perf::PerfGuard;
use crate::repository::{AnalysisSnapshotRepository, ScenarioSource};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// 对比至少需要的方案数
pub const MIN_COMPARISON_SCENARIOS: usize = 2;

// ==========================================
// AnalysisApi - 分析 API
// ==========================================

/// 分析API
///
/// 职责：
/// 1. 单方案分析并保存快照
/// 2. 多方案对比（单方案失败不影响其他方案）
/// 3. 快照查询、级联删除与 CSV 导出
pub struct AnalysisApi {
    source: Arc<dyn ScenarioSource>,
    snapshots: Arc<AnalysisSnapshotRepository>,
    orchestrator: Arc<AnalysisOrchestrator>,
}

impl AnalysisApi {
    /// 创建新的AnalysisApi实例
    pub fn new(
        source: Arc<dyn ScenarioSource>,
        snapshots: Arc<AnalysisSnapshotRepository>,
        config: EngineConfig,
    ) -> Self {
        Self {
            source,
            snapshots,
            orchestrator: Arc::new(AnalysisOrchestrator::new(config)),
        }
    }

    /// 通过配置读取器加载引擎参数后创建实例
    pub async fn with_config_reader(
        source: Arc<dyn ScenarioSource>,
        snapshots: Arc<AnalysisSnapshotRepository>,
        reader: &dyn EngineConfigReader,
    ) -> ApiResult<Self> {
        let config = reader
            .load_engine_config()
            .await
            .map_err(|e| ApiError::InternalError(format!("加载引擎参数失败: {}", e)))?;
        Ok(Self::new(source, snapshots, config))
    }

    pub fn engine_config(&self) -> &EngineConfig {
        self.orchestrator.config()
    }

    // ==========================================
    // 单方案分析
    // ==========================================

    /// 分析方案并保存快照
    ///
    /// # 返回
    /// - Ok(AnalysisSnapshot): 已持久化的快照
    /// - Err(ApiError::NotFound): 方案不存在
    /// - Err(ApiError::Configuration): 方案配置错误 (未开始计算)
    /// - Err(ApiError::Timeout): 超过 analysis_timeout_ms
    pub async fn run_analysis(&self, scenario_id: &str) -> ApiResult<AnalysisSnapshot> {
        let _perf = PerfGuard::with_detail("api.run_analysis", scenario_id);

        let resolved = self.source.resolve(scenario_id).await?;
        let result = self.run_with_deadline(resolved).await?;
        let snapshot = self.snapshots.save(&result)?;

        info!(
            scenario_id,
            snapshot_id = %snapshot.snapshot_id,
            total_npv = snapshot.result.summary.total_npv,
            "分析完成并已保存快照"
        );
        Ok(snapshot)
    }

    /// 直接分析已解析方案 (不持久化)
    pub fn analyze_resolved(&self, resolved: &ResolvedScenario) -> ApiResult<AnalysisResult> {
        Ok(self.orchestrator.run(resolved)?)
    }

    // ==========================================
    // 多方案对比
    // ==========================================

    /// 按方案 ID 对比
    ///
    /// 解析失败、配置错误或超时的方案记入 failures, 其余方案按 ranked_by 排名
    pub async fn compare_scenarios(
        &self,
        scenario_ids: &[String],
        ranked_by: ComparisonMetric,
    ) -> ApiResult<ComparisonResult> {
        if scenario_ids.len() < MIN_COMPARISON_SCENARIOS {
            return Err(ApiError::InvalidInput(format!(
                "对比至少需要 {} 个方案, 实际 {}",
                MIN_COMPARISON_SCENARIOS,
                scenario_ids.len()
            )));
        }
        let _perf = PerfGuard::with_detail("api.compare_scenarios", scenario_ids.join(","));

        let resolutions = join_all(scenario_ids.iter().map(|id| self.source.resolve(id))).await;
        let outcomes = join_all(scenario_ids.iter().zip(resolutions).map(
            |(id, resolution)| async move {
                let outcome = match resolution {
                    Ok(resolved) => self.run_with_deadline(resolved).await,
                    Err(e) => Err(ApiError::from(e)),
                };
                (id.clone(), outcome)
            },
        ))
        .await;

        Ok(self.rank_outcomes(outcomes, ranked_by))
    }

    /// 对比已解析方案 (CLI 用, 不经过数据源)
    pub async fn compare_resolved(
        &self,
        scenarios: Vec<ResolvedScenario>,
        ranked_by: ComparisonMetric,
    ) -> ApiResult<ComparisonResult> {
        if scenarios.len() < MIN_COMPARISON_SCENARIOS {
            return Err(ApiError::InvalidInput(format!(
                "对比至少需要 {} 个方案, 实际 {}",
                MIN_COMPARISON_SCENARIOS,
                scenarios.len()
            )));
        }
        let _perf = PerfGuard::new("api.compare_resolved");

        let outcomes = join_all(scenarios.into_iter().map(|resolved| async move {
            let id = resolved.scenario.scenario_id.clone();
            (id, self.run_with_deadline(resolved).await)
        }))
        .await;

        Ok(self.rank_outcomes(outcomes, ranked_by))
    }

    fn rank_outcomes(
        &self,
        outcomes: Vec<(String, ApiResult<AnalysisResult>)>,
        ranked_by: ComparisonMetric,
    ) -> ComparisonResult {
        let mut results = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();

        for (scenario_id, outcome) in outcomes {
            match outcome {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!(scenario_id = %scenario_id, error = %e, "方案未参与对比");
                    failures.push(ScenarioFailure {
                        scenario_id,
                        error: e.to_string(),
                    });
                }
            }
        }

        self.orchestrator
            .comparison()
            .compare(&results, failures, ranked_by)
    }

    /// 在阻塞线程池执行纯计算, 并施加调用方截止时间
    async fn run_with_deadline(&self, resolved: ResolvedScenario) -> ApiResult<AnalysisResult> {
        let scenario_id = resolved.scenario.scenario_id.clone();
        let timeout_ms = self.orchestrator.config().analysis_timeout_ms;
        let orchestrator = Arc::clone(&self.orchestrator);

        let handle = tokio::task::spawn_blocking(move || orchestrator.run(&resolved));
        match tokio::time::timeout(Duration::from_millis(timeout_ms), handle).await {
            Err(_) => Err(ApiError::Timeout {
                scenario_id,
                timeout_ms,
            }),
            Ok(Err(join_err)) => Err(ApiError::InternalError(format!(
                "分析任务异常终止: scenario_id={}, {}",
                scenario_id, join_err
            ))),
            Ok(Ok(result)) => result.map_err(ApiError::from),
        }
    }

    // ==========================================
    // 快照查询与导出
    // ==========================================

    pub fn list_snapshots(&self, scenario_id: &str) -> ApiResult<Vec<AnalysisSnapshot>> {
        Ok(self.snapshots.list_by_scenario(scenario_id)?)
    }

    pub fn latest_snapshot(&self, scenario_id: &str) -> ApiResult<AnalysisSnapshot> {
        self.snapshots
            .latest_for_scenario(scenario_id)?
            .ok_or_else(|| ApiError::NotFound(format!("方案 {} 无分析快照", scenario_id)))
    }

    /// 方案删除时级联删除其快照
    pub fn delete_scenario_snapshots(&self, scenario_id: &str) -> ApiResult<usize> {
        let deleted = self.snapshots.delete_by_scenario(scenario_id)?;
        info!(scenario_id, deleted, "已级联删除方案快照");
        Ok(deleted)
    }

    /// 导出方案最新快照为 CSV 文本
    pub fn export_latest_csv(&self, scenario_id: &str, kind: ExportKind) -> ApiResult<String> {
        let snapshot = self.latest_snapshot(scenario_id)?;
        Ok(export::to_csv_string(&snapshot.result, kind)?)
    }
}
