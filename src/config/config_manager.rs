// ==========================================
// 车队 TCO 分析系统 - 配置管理器
// ==========================================
// 职责: 引擎参数加载、查询、覆写
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::engine_config::EngineConfig;
use crate::config::engine_config_trait::EngineConfigReader;
use crate::db::{ensure_schema, open_sqlite_connection};
use crate::domain::types::ReplacementBasis;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::error::Error;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

type ConfigResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            ensure_schema(&guard)?;
        }

        Ok(Self { conn })
    }

    /// 读取 global scope 的配置值
    pub fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(value)
    }

    /// 写入 global scope 的配置值 (UPSERT)
    pub fn set_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;

        Ok(())
    }

    /// 一次性读取 global scope 的全部配置
    fn load_all(&self) -> ConfigResult<HashMap<String, String>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global'")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut map = HashMap::new();
        for row in rows {
            let (key, value) = row?;
            map.insert(key, value);
        }
        Ok(map)
    }

    /// 组装引擎参数; 缺失项取默认值, 格式错误记录告警后取默认值
    pub fn engine_config(&self) -> ConfigResult<EngineConfig> {
        let values = self.load_all()?;
        let defaults = EngineConfig::default();

        Ok(EngineConfig {
            staffing_safety_factor: parse_or(
                &values,
                config_keys::STAFFING_SAFETY_FACTOR,
                defaults.staffing_safety_factor,
            ),
            default_weibull_shape: parse_or(
                &values,
                config_keys::DEFAULT_WEIBULL_SHAPE,
                defaults.default_weibull_shape,
            ),
            curve_points: parse_or(&values, config_keys::CURVE_POINTS, defaults.curve_points),
            interval_search_steps: parse_or(
                &values,
                config_keys::INTERVAL_SEARCH_STEPS,
                defaults.interval_search_steps,
            ),
            unplanned_cost_multiplier: parse_or(
                &values,
                config_keys::UNPLANNED_COST_MULTIPLIER,
                defaults.unplanned_cost_multiplier,
            ),
            min_ramp_months: parse_or(
                &values,
                config_keys::MIN_RAMP_MONTHS,
                defaults.min_ramp_months,
            ),
            max_ramp_months: parse_or(
                &values,
                config_keys::MAX_RAMP_MONTHS,
                defaults.max_ramp_months,
            ),
            ramp_tail_months: parse_or(
                &values,
                config_keys::RAMP_TAIL_MONTHS,
                defaults.ramp_tail_months,
            ),
            cubic_feet_per_therm: parse_or(
                &values,
                config_keys::CUBIC_FEET_PER_THERM,
                defaults.cubic_feet_per_therm,
            ),
            replacement_basis: match values.get(config_keys::REPLACEMENT_BASIS) {
                Some(raw) => parse_replacement_basis(raw).unwrap_or_else(|| {
                    tracing::warn!(
                        config_key = config_keys::REPLACEMENT_BASIS,
                        raw_value = %raw,
                        "更换寿命口径配置无效，使用默认值"
                    );
                    defaults.replacement_basis
                }),
                None => defaults.replacement_basis,
            },
            analysis_timeout_ms: parse_or(
                &values,
                config_keys::ANALYSIS_TIMEOUT_MS,
                defaults.analysis_timeout_ms,
            ),
        })
    }
}

fn parse_or<T>(values: &HashMap<String, String>, key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match values.get(key) {
        Some(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
            tracing::warn!(config_key = key, raw_value = %raw, "配置格式错误，使用默认值");
            default
        }),
        None => default,
    }
}

fn parse_replacement_basis(raw: &str) -> Option<ReplacementBasis> {
    match raw.trim().to_uppercase().as_str() {
        "MEAN_LIFE" => Some(ReplacementBasis::MeanLife),
        "B10_LIFE" => Some(ReplacementBasis::B10Life),
        _ => None,
    }
}

// ==========================================
// EngineConfigReader Trait 实现
// ==========================================
#[async_trait]
impl EngineConfigReader for ConfigManager {
    async fn load_engine_config(&self) -> ConfigResult<EngineConfig> {
        self.engine_config()
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 人员
    pub const STAFFING_SAFETY_FACTOR: &str = "staffing_safety_factor";
    pub const MIN_RAMP_MONTHS: &str = "min_ramp_months";
    pub const MAX_RAMP_MONTHS: &str = "max_ramp_months";
    pub const RAMP_TAIL_MONTHS: &str = "ramp_tail_months";

    // 可靠性
    pub const DEFAULT_WEIBULL_SHAPE: &str = "default_weibull_shape";
    pub const CURVE_POINTS: &str = "curve_points";
    pub const INTERVAL_SEARCH_STEPS: &str = "interval_search_steps";
    pub const UNPLANNED_COST_MULTIPLIER: &str = "unplanned_cost_multiplier";
    pub const REPLACEMENT_BASIS: &str = "replacement_basis";

    // 燃料
    pub const CUBIC_FEET_PER_THERM: &str = "cubic_feet_per_therm";

    // 运行
    pub const ANALYSIS_TIMEOUT_MS: &str = "analysis_timeout_ms";
}
