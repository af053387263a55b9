// ==========================================
// 车队 TCO 分析系统 - CSV 导出
// ==========================================
// 导出内容: 逐年预测 / 任务成本明细 / 部件更换事件
// ==========================================

use crate::domain::result::AnalysisResult;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportKind {
    Projection,
    TaskCosts,
    Replacements,
}

impl FromStr for ExportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "projection" => Ok(ExportKind::Projection),
            "task_costs" | "tasks" => Ok(ExportKind::TaskCosts),
            "replacements" => Ok(ExportKind::Replacements),
            other => Err(format!("未知导出类型: {}", other)),
        }
    }
}

// 任务行扁平化 (周期/状态转为文本列)
#[derive(Serialize)]
struct TaskCostRecord<'a> {
    task_id: &'a str,
    name: &'a str,
    status: String,
    recurrence: String,
    skill_tier: String,
    services_per_year: f64,
    labor_hours_per_year: f64,
    labor_cost_per_year: f64,
    parts_cost_per_year: f64,
    total_cost_per_year: f64,
    labor_hours_pct: f64,
}

/// 写出 CSV 到任意 Writer
pub fn write_csv<W: Write>(result: &AnalysisResult, kind: ExportKind, out: W) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    match kind {
        ExportKind::Projection => {
            for row in &result.projection {
                writer.serialize(row)?;
            }
        }
        ExportKind::TaskCosts => {
            for row in &result.task_costs.rows {
                writer.serialize(TaskCostRecord {
                    task_id: &row.task_id,
                    name: &row.name,
                    status: row.status.to_string(),
                    recurrence: row.recurrence.to_string(),
                    skill_tier: row.skill_tier.to_string(),
                    services_per_year: row.services_per_year,
                    labor_hours_per_year: row.labor_hours_per_year,
                    labor_cost_per_year: row.labor_cost_per_year,
                    parts_cost_per_year: row.parts_cost_per_year,
                    total_cost_per_year: row.total_cost_per_year,
                    labor_hours_pct: row.labor_hours_pct,
                })?;
            }
        }
        ExportKind::Replacements => {
            for event in &result.replacements.events {
                writer.serialize(event)?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}

/// 导出为字符串
pub fn to_csv_string(result: &AnalysisResult, kind: ExportKind) -> csv::Result<String> {
    let mut buf = Vec::new();
    write_csv(result, kind, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// 导出到文件
pub fn write_csv_file(
    result: &AnalysisResult,
    kind: ExportKind,
    path: impl AsRef<Path>,
) -> csv::Result<()> {
    let file = std::fs::File::create(path)?;
    write_csv(result, kind, file)
}
