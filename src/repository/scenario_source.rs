// ==========================================
// 车队 TCO 分析系统 - 方案数据源
// ==========================================
// 职责: 数据访问边界, scenario_id → ResolvedScenario
// 说明: 车队/维护计划/价格目录的增删改由外部系统负责,
//       引擎只消费已解析、已关联的记录
// ==========================================

use crate::domain::scenario::ResolvedScenario;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// 方案数据源 trait
///
/// 解析可能涉及 I/O, 因此为 async; 引擎本身同步执行
#[async_trait]
pub trait ScenarioSource: Send + Sync {
    /// 解析方案; 未知 ID 返回 `RepositoryError::NotFound`
    async fn resolve(&self, scenario_id: &str) -> RepositoryResult<ResolvedScenario>;
}

// ==========================================
// InMemoryScenarioSource - 内存数据源
// ==========================================
#[derive(Default)]
pub struct InMemoryScenarioSource {
    scenarios: RwLock<HashMap<String, ResolvedScenario>>,
}

impl InMemoryScenarioSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scenarios(scenarios: impl IntoIterator<Item = ResolvedScenario>) -> Self {
        let scenarios = scenarios
            .into_iter()
            .map(|s| (s.scenario.scenario_id.clone(), s))
            .collect();
        Self {
            scenarios: RwLock::new(scenarios),
        }
    }

    /// 插入或替换方案
    pub fn insert(&self, scenario: ResolvedScenario) -> RepositoryResult<()> {
        let mut guard = self
            .scenarios
            .write()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        guard.insert(scenario.scenario.scenario_id.clone(), scenario);
        Ok(())
    }

    /// 删除方案, 返回是否存在
    pub fn remove(&self, scenario_id: &str) -> RepositoryResult<bool> {
        let mut guard = self
            .scenarios
            .write()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        Ok(guard.remove(scenario_id).is_some())
    }

    pub fn len(&self) -> usize {
        self.scenarios.read().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ScenarioSource for InMemoryScenarioSource {
    async fn resolve(&self, scenario_id: &str) -> RepositoryResult<ResolvedScenario> {
        let guard = self
            .scenarios
            .read()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        guard
            .get(scenario_id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("Scenario", scenario_id))
    }
}
