// ==========================================
// 车队 TCO 分析系统 - 维护任务成本引擎
// ==========================================
// 职责: 维护任务 + 价格目录 → 年化人工/备件成本
// 输入: PmTask 列表 + Scenario (费率/折扣/管理费) + 车队规模
// 输出: TaskCostSummary (逐任务明细 + 车队合计)
// ==========================================
// 规则:
// - 一次性任务: 每台一次, 集中在投运期, 全额计入首年
// - 管理费只对 (人工+备件) 合计加一次, 不逐任务加
// - 工时占比两遍计算: 先求合计, 再归一化
// ==========================================

use crate::domain::pm_task::{PmTask, TaskPart};
use crate::domain::price::PriceCatalog;
use crate::domain::result::{TaskCostRow, TaskCostSummary};
use crate::domain::scenario::Scenario;
use crate::domain::types::{RecurrenceKind, SkillTier, TaskStatus};
use crate::engine::error::{EngineError, EngineResult};
use std::collections::BTreeSet;
use tracing::{debug, warn};

// ==========================================
// TaskCostEngine - 维护任务成本引擎
// ==========================================
pub struct TaskCostEngine;

impl TaskCostEngine {
    pub fn new() -> Self {
        Self
    }

    /// 计算全部任务的年化成本
    ///
    /// # 参数
    /// - `tasks`: 维护任务列表 (备件已关联)
    /// - `scenario`: 分析方案 (费率、备件折扣、管理费)
    /// - `total_units`: 车队总台数
    /// - `avg_annual_hours`: 台数加权平均年运行小时
    /// - `catalog`: 价格目录
    pub fn calculate(
        &self,
        tasks: &[PmTask],
        scenario: &Scenario,
        total_units: u32,
        avg_annual_hours: f64,
        catalog: &PriceCatalog,
    ) -> EngineResult<TaskCostSummary> {
        let discount = scenario.parts_discount_fraction();
        let mut unpriced = BTreeSet::new();

        // 第一遍: 逐任务成本
        let mut rows = Vec::with_capacity(tasks.len());
        for task in tasks {
            let tier: SkillTier =
                task.skill_level
                    .parse()
                    .map_err(|_| EngineError::UnrecognizedSkillTier {
                        task_id: task.task_id.clone(),
                        value: task.skill_level.clone(),
                    })?;

            let recurrence = task.recurrence();
            let status = Self::task_status(task, recurrence);

            if status != TaskStatus::Active {
                if status == TaskStatus::Unscheduled {
                    warn!(task_id = %task.task_id, "任务无有效周期, 不计成本");
                }
                rows.push(Self::zero_row(task, status, recurrence, tier));
                continue;
            }

            let services_per_year =
                Self::services_per_year(recurrence, total_units, avg_annual_hours);
            let labor_hours_per_year = services_per_year * task.labor_hours_per_service;
            let labor_cost_per_year = labor_hours_per_year * scenario.labor_rates.rate(tier);
            let parts_per_service =
                Self::parts_cost_per_service(&task.parts, catalog, discount, &mut unpriced);
            let parts_cost_per_year = services_per_year * parts_per_service;

            rows.push(TaskCostRow {
                task_id: task.task_id.clone(),
                name: task.name.clone(),
                status,
                recurrence,
                skill_tier: tier,
                services_per_year,
                labor_hours_per_year,
                labor_cost_per_year,
                parts_cost_per_year,
                total_cost_per_year: labor_cost_per_year + parts_cost_per_year,
                labor_hours_pct: 0.0,
            });
        }

        let total_labor_hours: f64 = rows.iter().map(|r| r.labor_hours_per_year).sum();

        // 第二遍: 工时占比归一化
        let rows: Vec<TaskCostRow> = rows
            .into_iter()
            .map(|row| {
                let pct = if total_labor_hours > 0.0 {
                    row.labor_hours_per_year / total_labor_hours * 100.0
                } else {
                    0.0
                };
                TaskCostRow {
                    labor_hours_pct: pct,
                    ..row
                }
            })
            .collect();

        let total_labor_cost: f64 = rows.iter().map(|r| r.labor_cost_per_year).sum();
        let total_parts_cost: f64 = rows.iter().map(|r| r.parts_cost_per_year).sum();
        let overhead_cost = (total_labor_cost + total_parts_cost) * scenario.overhead_fraction();

        let one_time_rows = || {
            rows.iter()
                .filter(|r| r.status == TaskStatus::Active && r.is_one_time())
        };
        let one_time_subtotal = one_time_rows().map(|r| r.total_cost_per_year).sum();
        let one_time_labor_hours = one_time_rows().map(|r| r.labor_hours_per_year).sum();

        debug!(
            tasks = rows.len(),
            total_labor_hours,
            total_labor_cost,
            total_parts_cost,
            overhead_cost,
            unpriced = unpriced.len(),
            "维护任务成本计算完成"
        );

        Ok(TaskCostSummary {
            rows,
            total_labor_hours,
            total_labor_cost,
            total_parts_cost,
            overhead_cost,
            total_cost: total_labor_cost + total_parts_cost + overhead_cost,
            one_time_subtotal,
            one_time_labor_hours,
            unpriced_parts: unpriced.into_iter().collect(),
        })
    }

    // ==========================================
    // 辅助计算
    // ==========================================

    fn task_status(task: &PmTask, recurrence: RecurrenceKind) -> TaskStatus {
        if !task.enabled {
            TaskStatus::Disabled
        } else if task.is_automated {
            TaskStatus::Automated
        } else if recurrence == RecurrenceKind::Unscheduled {
            TaskStatus::Unscheduled
        } else {
            TaskStatus::Active
        }
    }

    /// 年服务次数
    pub fn services_per_year(
        recurrence: RecurrenceKind,
        total_units: u32,
        avg_annual_hours: f64,
    ) -> f64 {
        let units = total_units as f64;
        match recurrence {
            RecurrenceKind::OneTime => units,
            RecurrenceKind::Hours(interval) => units * avg_annual_hours / interval,
            RecurrenceKind::Months(interval) => units * (12.0 / interval),
            RecurrenceKind::Unscheduled => 0.0,
        }
    }

    /// 单次服务备件成本 (不含可选备件, 已扣折扣)
    fn parts_cost_per_service(
        parts: &[TaskPart],
        catalog: &PriceCatalog,
        discount: f64,
        unpriced: &mut BTreeSet<String>,
    ) -> f64 {
        parts
            .iter()
            .filter(|p| !p.is_optional)
            .filter_map(|p| p.part_number.as_deref().map(|pn| (pn, p.quantity)))
            .map(|(pn, quantity)| match catalog.unit_price(pn) {
                Some(price) => price * quantity * (1.0 - discount),
                None => {
                    unpriced.insert(pn.trim().to_string());
                    0.0
                }
            })
            .sum()
    }

    fn zero_row(
        task: &PmTask,
        status: TaskStatus,
        recurrence: RecurrenceKind,
        tier: SkillTier,
    ) -> TaskCostRow {
        TaskCostRow {
            task_id: task.task_id.clone(),
            name: task.name.clone(),
            status,
            recurrence,
            skill_tier: tier,
            services_per_year: 0.0,
            labor_hours_per_year: 0.0,
            labor_cost_per_year: 0.0,
            parts_cost_per_year: 0.0,
            total_cost_per_year: 0.0,
            labor_hours_pct: 0.0,
        }
    }
}

impl Default for TaskCostEngine {
    fn default() -> Self {
        Self::new()
    }
}
