// ==========================================
// 车队 TCO 分析系统 - 多方案对比
// ==========================================
// 职责: 已完成分析结果 → 指标对照表 + 各指标最优方案 + 最低 TCO
// 规则: 利用率越高越好, 其余指标越低越好; 并列时取输入顺序靠前者
// 排名: 每个指标给出名次, 另按调用方选定的指标输出排序表
// ==========================================

use crate::domain::result::{
    AnalysisResult, ComparisonEntry, ComparisonResult, LowestTco, MetricWinner, RankedScenario,
    ScenarioFailure,
};
use crate::domain::types::ComparisonMetric;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::info;

pub struct ComparisonEngine;

impl ComparisonEngine {
    pub fn new() -> Self {
        Self
    }

    /// 从单方案分析结果提取对比指标
    pub fn entry_from(result: &AnalysisResult) -> ComparisonEntry {
        let s = &result.summary;
        let metrics: BTreeMap<ComparisonMetric, f64> = ComparisonMetric::ALL
            .iter()
            .map(|metric| {
                let value = match metric {
                    ComparisonMetric::TotalNpv => s.total_npv,
                    ComparisonMetric::TotalNominal => s.total_nominal,
                    ComparisonMetric::AnnualMaintenanceCost => s.annual_maintenance_cost,
                    ComparisonMetric::AnnualTotalCost => s.annual_total_cost,
                    ComparisonMetric::CostPerKwh => s.cost_per_kwh,
                    ComparisonMetric::CostPerOperatingHour => s.cost_per_operating_hour,
                    ComparisonMetric::TechniciansNeeded => s.technicians_needed as f64,
                    ComparisonMetric::TechnicianUtilization => s.technician_utilization,
                };
                (*metric, value)
            })
            .collect();

        ComparisonEntry {
            scenario_id: result.scenario_id.clone(),
            scenario_name: result.scenario_name.clone(),
            metrics,
            ranks: BTreeMap::new(),
        }
    }

    pub fn compare(
        &self,
        results: &[AnalysisResult],
        failures: Vec<ScenarioFailure>,
        ranked_by: ComparisonMetric,
    ) -> ComparisonResult {
        let entries = results.iter().map(Self::entry_from).collect();
        self.rank(entries, failures, ranked_by)
    }

    /// 对指标表排名
    ///
    /// # 参数
    /// - ranked_by: 输出排序表所依据的指标
    pub fn rank(
        &self,
        mut entries: Vec<ComparisonEntry>,
        failures: Vec<ScenarioFailure>,
        ranked_by: ComparisonMetric,
    ) -> ComparisonResult {
        for metric in ComparisonMetric::ALL {
            for (position, idx) in Self::order_by(&entries, metric).into_iter().enumerate() {
                entries[idx].ranks.insert(metric, position as u32 + 1);
            }
        }

        let ranking: Vec<RankedScenario> = Self::order_by(&entries, ranked_by)
            .into_iter()
            .enumerate()
            .map(|(position, idx)| {
                let entry = &entries[idx];
                RankedScenario {
                    rank: position as u32 + 1,
                    scenario_id: entry.scenario_id.clone(),
                    scenario_name: entry.scenario_name.clone(),
                    value: entry.metrics.get(&ranked_by).copied().unwrap_or(0.0),
                }
            })
            .collect();

        let best_by_metric: Vec<MetricWinner> = ComparisonMetric::ALL
            .iter()
            .filter_map(|metric| Self::winner(&entries, *metric))
            .collect();

        let npv_winner = best_by_metric
            .iter()
            .find(|w| w.metric == ComparisonMetric::TotalNpv);

        let npv_gap = npv_winner
            .map(|w| (w.worst_value - w.best_value).abs())
            .unwrap_or(0.0);

        let lowest_tco = npv_winner.and_then(|w| {
            entries
                .iter()
                .find(|e| e.scenario_id == w.best_scenario_id)
                .map(|e| LowestTco {
                    scenario_id: e.scenario_id.clone(),
                    scenario_name: e.scenario_name.clone(),
                    total_npv: w.best_value,
                    savings_vs_highest: w.worst_value - w.best_value,
                })
        });

        info!(
            compared = entries.len(),
            failed = failures.len(),
            ranked_by = %ranked_by,
            lowest_tco = lowest_tco.as_ref().map(|l| l.scenario_id.as_str()).unwrap_or("-"),
            npv_gap,
            "方案对比完成"
        );

        ComparisonResult {
            entries,
            ranked_by,
            ranking,
            best_by_metric,
            npv_gap,
            lowest_tco,
            failures,
        }
    }

    /// 按指标方向由优到劣排序的下标 (稳定排序, 并列保持输入顺序)
    fn order_by(entries: &[ComparisonEntry], metric: ComparisonMetric) -> Vec<usize> {
        let mut order: Vec<usize> = (0..entries.len())
            .filter(|&i| entries[i].metrics.contains_key(&metric))
            .collect();
        let value = |i: usize| entries[i].metrics.get(&metric).copied().unwrap_or(0.0);
        order.sort_by(|&a, &b| {
            let ord = value(a).partial_cmp(&value(b)).unwrap_or(Ordering::Equal);
            if metric.higher_is_better() {
                ord.reverse()
            } else {
                ord
            }
        });
        order
    }

    fn winner(entries: &[ComparisonEntry], metric: ComparisonMetric) -> Option<MetricWinner> {
        let values: Vec<(&str, f64)> = entries
            .iter()
            .filter_map(|e| e.metrics.get(&metric).map(|v| (e.scenario_id.as_str(), *v)))
            .collect();

        let is_better = |candidate: f64, current: f64| {
            if metric.higher_is_better() {
                candidate > current
            } else {
                candidate < current
            }
        };

        let (first, rest) = values.split_first()?;
        let mut best = *first;
        let mut worst = *first;
        for &(id, value) in rest {
            if is_better(value, best.1) {
                best = (id, value);
            }
            if is_better(worst.1, value) {
                worst = (id, value);
            }
        }

        Some(MetricWinner {
            metric,
            best_scenario_id: best.0.to_string(),
            best_value: best.1,
            worst_value: worst.1,
        })
    }
}

impl Default for ComparisonEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_entry(id: &str, npv: f64, utilization: f64) -> ComparisonEntry {
        let mut metrics = BTreeMap::new();
        for metric in ComparisonMetric::ALL {
            metrics.insert(metric, 1.0);
        }
        metrics.insert(ComparisonMetric::TotalNpv, npv);
        metrics.insert(ComparisonMetric::TechnicianUtilization, utilization);
        ComparisonEntry {
            scenario_id: id.to_string(),
            scenario_name: format!("方案{}", id),
            metrics,
            ranks: BTreeMap::new(),
        }
    }

    #[test]
    fn test_lowest_tco_and_savings() {
        let engine = ComparisonEngine::new();
        let result = engine.rank(
            vec![create_test_entry("A", 100.0, 0.5), create_test_entry("B", 80.0, 0.7)],
            vec![],
            ComparisonMetric::TotalNpv,
        );

        let lowest = result.lowest_tco.unwrap();
        assert_eq!(lowest.scenario_id, "B");
        assert!((lowest.total_npv - 80.0).abs() < 1e-12);
        assert!((lowest.savings_vs_highest - 20.0).abs() < 1e-12);
        assert!((result.npv_gap - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_utilization_higher_is_better() {
        let engine = ComparisonEngine::new();
        let result = engine.rank(
            vec![create_test_entry("A", 100.0, 0.9), create_test_entry("B", 80.0, 0.6)],
            vec![],
            ComparisonMetric::TotalNpv,
        );
        let util = result
            .best_by_metric
            .iter()
            .find(|w| w.metric == ComparisonMetric::TechnicianUtilization)
            .unwrap();
        assert_eq!(util.best_scenario_id, "A");
        assert_eq!(util.worst_value, 0.6);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let engine = ComparisonEngine::new();
        let result = engine.rank(
            vec![create_test_entry("A", 50.0, 0.5), create_test_entry("B", 50.0, 0.5)],
            vec![],
            ComparisonMetric::TotalNpv,
        );
        assert!(result
            .best_by_metric
            .iter()
            .all(|w| w.best_scenario_id == "A"));
        assert_eq!(result.npv_gap, 0.0);
    }

    #[test]
    fn test_failures_are_carried_and_empty_table_has_no_winner() {
        let engine = ComparisonEngine::new();
        let result = engine.rank(
            vec![],
            vec![ScenarioFailure {
                scenario_id: "X".to_string(),
                error: "车队为空".to_string(),
            }],
            ComparisonMetric::TotalNpv,
        );
        assert!(result.lowest_tco.is_none());
        assert!(result.best_by_metric.is_empty());
        assert!(result.ranking.is_empty());
        assert_eq!(result.failures.len(), 1);
    }

    #[test]
    fn test_three_scenarios_ranked_by_chosen_metric() {
        let engine = ComparisonEngine::new();
        let entries = vec![
            create_test_entry("A", 120.0, 0.4),
            create_test_entry("B", 90.0, 0.8),
            create_test_entry("C", 100.0, 0.6),
        ];

        let by_npv = engine.rank(entries.clone(), vec![], ComparisonMetric::TotalNpv);
        let order: Vec<&str> = by_npv.ranking.iter().map(|r| r.scenario_id.as_str()).collect();
        assert_eq!(order, vec!["B", "C", "A"]);
        assert_eq!(by_npv.ranking[0].rank, 1);
        assert_eq!(by_npv.ranking[2].value, 120.0);

        // 表格保持输入顺序, 名次写入各行
        let ids: Vec<&str> = by_npv.entries.iter().map(|e| e.scenario_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
        assert_eq!(by_npv.entries[0].ranks[&ComparisonMetric::TotalNpv], 3);
        assert_eq!(by_npv.entries[2].ranks[&ComparisonMetric::TotalNpv], 2);
        assert_eq!(by_npv.entries[1].ranks[&ComparisonMetric::TechnicianUtilization], 1);

        let by_util = engine.rank(entries, vec![], ComparisonMetric::TechnicianUtilization);
        assert_eq!(by_util.ranked_by, ComparisonMetric::TechnicianUtilization);
        let order: Vec<&str> = by_util.ranking.iter().map(|r| r.scenario_id.as_str()).collect();
        assert_eq!(order, vec!["B", "C", "A"]);
    }

    #[test]
    fn test_tied_values_ranked_in_input_order() {
        let engine = ComparisonEngine::new();
        let result = engine.rank(
            vec![
                create_test_entry("A", 50.0, 0.5),
                create_test_entry("B", 40.0, 0.5),
                create_test_entry("C", 50.0, 0.5),
            ],
            vec![],
            ComparisonMetric::TotalNpv,
        );
        let order: Vec<(u32, &str)> = result
            .ranking
            .iter()
            .map(|r| (r.rank, r.scenario_id.as_str()))
            .collect();
        assert_eq!(order, vec![(1, "B"), (2, "A"), (3, "C")]);
    }
}
