// ==========================================
// 车队 TCO 分析系统 - 分析快照仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 存储: analysis_snapshot 表, 结果以 JSON 整体保存
// ==========================================

use crate::db::{ensure_schema, open_sqlite_connection};
use crate::domain::result::AnalysisResult;
use crate::domain::snapshot::AnalysisSnapshot;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};
use tracing::debug;

// 原始行: (snapshot_id, scenario_id, created_at, result_json)
type SnapshotRow = (String, String, String, String);

// ==========================================
// AnalysisSnapshotRepository - 分析快照仓储
// ==========================================
/// 分析快照仓储
/// 职责: 管理 analysis_snapshot 表的写入、查询与按方案级联删除
pub struct AnalysisSnapshotRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AnalysisSnapshotRepository {
    /// 创建新的仓储实例 (自动建表)
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例 (自动建表)
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            ensure_schema(&guard)?;
        }
        Ok(Self { conn })
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 保存分析结果为新快照
    ///
    /// # 返回
    /// - Ok(AnalysisSnapshot): 含生成的 snapshot_id 与 created_at
    pub fn save(&self, result: &AnalysisResult) -> RepositoryResult<AnalysisSnapshot> {
        let snapshot = AnalysisSnapshot::new(result.clone());
        self.insert(&snapshot)?;
        Ok(snapshot)
    }

    /// 写入已构造的快照
    pub fn insert(&self, snapshot: &AnalysisSnapshot) -> RepositoryResult<()> {
        let result_json = serde_json::to_string(&snapshot.result)?;
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO analysis_snapshot (snapshot_id, scenario_id, created_at, result_json)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                snapshot.snapshot_id,
                snapshot.scenario_id,
                format_timestamp(&snapshot.created_at),
                result_json,
            ],
        )?;

        debug!(
            snapshot_id = %snapshot.snapshot_id,
            scenario_id = %snapshot.scenario_id,
            "分析快照已保存"
        );
        Ok(())
    }

    /// 按 snapshot_id 查询
    ///
    /// # 返回
    /// - Ok(Some(AnalysisSnapshot)): 找到快照
    /// - Ok(None): 未找到
    pub fn find_by_id(&self, snapshot_id: &str) -> RepositoryResult<Option<AnalysisSnapshot>> {
        let conn = self.get_conn()?;
        let row: Option<SnapshotRow> = conn
            .query_row(
                r#"
                SELECT snapshot_id, scenario_id, created_at, result_json
                FROM analysis_snapshot
                WHERE snapshot_id = ?1
                "#,
                params![snapshot_id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .optional()?;

        row.map(map_snapshot).transpose()
    }

    /// 按方案查询全部快照 (最新在前)
    pub fn list_by_scenario(&self, scenario_id: &str) -> RepositoryResult<Vec<AnalysisSnapshot>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT snapshot_id, scenario_id, created_at, result_json
            FROM analysis_snapshot
            WHERE scenario_id = ?1
            ORDER BY created_at DESC, rowid DESC
            "#,
        )?;

        let rows = stmt
            .query_map(params![scenario_id], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
            })?
            .collect::<Result<Vec<SnapshotRow>, _>>()?;

        rows.into_iter().map(map_snapshot).collect()
    }

    /// 方案最新一次快照
    pub fn latest_for_scenario(
        &self,
        scenario_id: &str,
    ) -> RepositoryResult<Option<AnalysisSnapshot>> {
        let conn = self.get_conn()?;
        let row: Option<SnapshotRow> = conn
            .query_row(
                r#"
                SELECT snapshot_id, scenario_id, created_at, result_json
                FROM analysis_snapshot
                WHERE scenario_id = ?1
                ORDER BY created_at DESC, rowid DESC
                LIMIT 1
                "#,
                params![scenario_id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .optional()?;

        row.map(map_snapshot).transpose()
    }

    /// 删除方案的全部快照 (方案删除时级联调用)
    ///
    /// # 返回
    /// - Ok(usize): 删除的记录数
    pub fn delete_by_scenario(&self, scenario_id: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let deleted = conn.execute(
            "DELETE FROM analysis_snapshot WHERE scenario_id = ?1",
            params![scenario_id],
        )?;
        debug!(scenario_id, deleted, "方案快照已删除");
        Ok(deleted)
    }
}

// 微秒精度 + 固定 Z 后缀, 字符串序即时间序
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn map_snapshot(row: SnapshotRow) -> RepositoryResult<AnalysisSnapshot> {
    let (snapshot_id, scenario_id, created_at, result_json) = row;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| RepositoryError::Serialization(format!("created_at={}: {}", created_at, e)))?
        .with_timezone(&Utc);
    let result: AnalysisResult = serde_json::from_str(&result_json)?;

    Ok(AnalysisSnapshot {
        snapshot_id,
        scenario_id,
        created_at,
        result,
    })
}
