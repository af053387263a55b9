// ==========================================
// 车队 TCO 分析系统 - 命令行入口
// ==========================================
// 用法:
//   fleet-tco analyze <scenario.json> [--no-save] [--csv projection|task_costs|replacements [--out <file>]]
//   fleet-tco compare <a.json> <b.json> [...] [--rank-by total_npv|annual_total_cost|...]
//   fleet-tco curve <mean_life_hours> [shape]
//
// 输入文件为已解析方案 (ResolvedScenario) 的 JSON; 结果输出到 stdout
// 数据库路径: FLEET_TCO_DB_PATH 或用户数据目录
// ==========================================

use anyhow::{bail, Context};
use fleet_tco::config::{ConfigManager, EngineConfig};
use fleet_tco::db::get_default_db_path;
use fleet_tco::engine::ReliabilityModel;
use fleet_tco::export::{self, ExportKind};
use fleet_tco::repository::{AnalysisSnapshotRepository, InMemoryScenarioSource};
use fleet_tco::{logging, AnalysisApi, ComparisonMetric, ResolvedScenario};
use std::sync::Arc;

const USAGE: &str = "用法:
  fleet-tco analyze <scenario.json> [--no-save] [--csv projection|task_costs|replacements [--out <file>]]
  fleet-tco compare <a.json> <b.json> [...] [--rank-by <metric>]
  fleet-tco curve <mean_life_hours> [shape]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        bail!("{}", USAGE);
    };

    tracing::info!("{} v{}", fleet_tco::APP_NAME, fleet_tco::VERSION);

    match command.as_str() {
        "analyze" => analyze(rest).await,
        "compare" => compare(rest).await,
        "curve" => curve(rest),
        other => bail!("未知命令: {}\n{}", other, USAGE),
    }
}

fn load_scenario(path: &str) -> anyhow::Result<ResolvedScenario> {
    let text = std::fs::read_to_string(path).with_context(|| format!("读取方案文件失败: {}", path))?;
    serde_json::from_str(&text).with_context(|| format!("解析方案文件失败: {}", path))
}

fn load_engine_config(db_path: &str) -> EngineConfig {
    match ConfigManager::new(db_path).and_then(|m| m.engine_config()) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "读取引擎参数失败, 使用默认值");
            EngineConfig::default()
        }
    }
}

fn build_api(scenarios: Vec<ResolvedScenario>) -> anyhow::Result<AnalysisApi> {
    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);

    let config = load_engine_config(&db_path);
    let snapshots = AnalysisSnapshotRepository::new(&db_path)
        .with_context(|| format!("打开快照库失败: {}", db_path))?;
    let source = InMemoryScenarioSource::with_scenarios(scenarios);

    Ok(AnalysisApi::new(Arc::new(source), Arc::new(snapshots), config))
}

async fn analyze(args: &[String]) -> anyhow::Result<()> {
    let mut path = None;
    let mut save = true;
    let mut csv_kind = None;
    let mut out_path = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--no-save" => save = false,
            "--csv" => {
                let kind = iter.next().context("--csv 需要导出类型")?;
                csv_kind = Some(kind.parse::<ExportKind>().map_err(anyhow::Error::msg)?);
            }
            "--out" => out_path = Some(iter.next().context("--out 需要文件路径")?.clone()),
            other if path.is_none() => path = Some(other.to_string()),
            other => bail!("多余参数: {}", other),
        }
    }
    let path = path.context(USAGE)?;
    if out_path.is_some() && csv_kind.is_none() {
        bail!("--out 只能与 --csv 一起使用");
    }

    let scenario = load_scenario(&path)?;
    let scenario_id = scenario.scenario.scenario_id.clone();
    let api = build_api(vec![scenario.clone()])?;

    let result = if save {
        api.run_analysis(&scenario_id).await?.result
    } else {
        api.analyze_resolved(&scenario)?
    };

    match (csv_kind, out_path) {
        (Some(kind), Some(out)) => {
            export::write_csv_file(&result, kind, &out)
                .with_context(|| format!("写出 CSV 失败: {}", out))?;
            tracing::info!("CSV 已写出: {}", out);
        }
        (Some(kind), None) => print!("{}", export::to_csv_string(&result, kind)?),
        (None, _) => println!("{}", serde_json::to_string_pretty(&result)?),
    }
    Ok(())
}

async fn compare(args: &[String]) -> anyhow::Result<()> {
    let mut paths = Vec::new();
    let mut ranked_by = ComparisonMetric::TotalNpv;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--rank-by" => {
                let metric = iter.next().context("--rank-by 需要指标名")?;
                ranked_by = metric.parse()?;
            }
            other => paths.push(other.to_string()),
        }
    }
    if paths.len() < fleet_tco::api::MIN_COMPARISON_SCENARIOS {
        bail!("{}", USAGE);
    }
    let scenarios = paths
        .iter()
        .map(|p| load_scenario(p))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let api = build_api(vec![])?;
    let comparison = api.compare_resolved(scenarios, ranked_by).await?;
    println!("{}", serde_json::to_string_pretty(&comparison)?);
    Ok(())
}

fn curve(args: &[String]) -> anyhow::Result<()> {
    let mean_life: f64 = args
        .first()
        .context(USAGE)?
        .parse()
        .context("mean_life_hours 必须为数值")?;
    let config = load_engine_config(&get_default_db_path());
    let shape: f64 = match args.get(1) {
        Some(s) => s.parse().context("shape 必须为数值")?,
        None => config.default_weibull_shape,
    };

    let curve = ReliabilityModel::new().failure_curve(mean_life, shape, config.curve_points)?;
    println!("{}", serde_json::to_string_pretty(&curve)?);
    Ok(())
}
