// ==========================================
// 电机运行监测系统 - 报警日志仓储
// ==========================================
// 对齐: 报警日志表头 timestamp,variable,level,description,status
// 红线: 只追加、不修改、不淘汰；追加必须持有 `<file>.lock` 排他锁
//       （读取 - 修改 - 全量写回 非原子，并发追加会丢报警）
// ==========================================

use crate::domain::alarm::{level_distribution, AlarmRecord, ALARM_TS_FORMAT};
use crate::domain::reading::ScoredReading;
use crate::domain::types::{normalize_header, AlarmLevel, AlarmStatus};
use crate::repository::error::{Loaded, RepositoryError, RepositoryResult};
use crate::repository::file_store::{quarantine_corrupt, rewrite_csv, with_file_lock};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// 报警日志表头
pub const ALARM_LOG_HEADER: [&str; 5] = ["timestamp", "variable", "level", "description", "status"];

/// 读取结果（区分 "文件不存在" 与 "文件损坏"）
enum LogRead {
    Missing,
    Corrupt(String),
    Ok(Vec<AlarmRecord>),
}

// ==========================================
// AlarmLogRepository - 报警日志仓储
// ==========================================
pub struct AlarmLogRepository {
    path: PathBuf,
}

impl AlarmLogRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 为评分结果中的每条 Risk 读数生成报警并追加
    ///
    /// # 参数
    /// - `scored`: 本轮评分结果
    /// - `scored_at`: 评分时间（报警时间戳）
    ///
    /// # 返回
    /// - `Ok(Loaded<usize>)`: 本次新增报警数，附带日志不可读告警（如有）
    pub fn record(
        &self,
        scored: &[ScoredReading],
        scored_at: NaiveDateTime,
    ) -> RepositoryResult<Loaded<usize>> {
        let alarms: Vec<AlarmRecord> = scored
            .iter()
            .filter(|s| s.is_risk())
            .map(|s| AlarmRecord::from_cause(s.cause, scored_at))
            .collect();

        self.append(alarms)
    }

    /// 追加报警记录（保留全部历史，按插入顺序）
    pub fn append(&self, alarms: Vec<AlarmRecord>) -> RepositoryResult<Loaded<usize>> {
        if alarms.is_empty() {
            return Ok(Loaded::clean(0));
        }

        with_file_lock(&self.path, || {
            let read = self.read_log();
            let corrupt = matches!(read, LogRead::Corrupt(_));
            let mut history = self.resolve(read);
            if corrupt {
                quarantine_corrupt(&self.path)?;
            }

            let appended = alarms.len();
            history.data.extend(alarms);
            self.write_all(&history.data)?;

            tracing::info!(
                path = %self.path.display(),
                appended,
                total = history.data.len(),
                "报警已追加到日志"
            );
            Ok(history.map(|_| appended))
        })
    }

    fn write_all(&self, records: &[AlarmRecord]) -> RepositoryResult<()> {
        rewrite_csv(&self.path, |writer| {
            writer.write_record(ALARM_LOG_HEADER)?;
            for record in records {
                writer.write_record([
                    record.timestamp.format(ALARM_TS_FORMAT).to_string(),
                    record.variable.clone(),
                    record.level.to_string(),
                    record.description.clone(),
                    record.status.to_string(),
                ])?;
            }
            Ok(())
        })
    }

    // ==========================================
    // 查询操作
    // ==========================================

    /// 读取全部报警历史（插入顺序）
    ///
    /// 日志缺失: 空历史，无告警；日志损坏: 空历史 + LogUnavailable 告警
    pub fn read_all(&self) -> Loaded<Vec<AlarmRecord>> {
        self.resolve(self.read_log())
    }

    /// 按等级统计报警数量
    pub fn level_distribution(&self) -> Loaded<BTreeMap<AlarmLevel, usize>> {
        self.read_all().map(|records| level_distribution(&records))
    }

    /// 待处理报警数量
    pub fn pending_count(&self) -> Loaded<usize> {
        self.read_all().map(|records| {
            records
                .iter()
                .filter(|r| r.status == AlarmStatus::Pending)
                .count()
        })
    }

    fn resolve(&self, read: LogRead) -> Loaded<Vec<AlarmRecord>> {
        match read {
            LogRead::Ok(records) => Loaded::clean(records),
            LogRead::Missing => Loaded::clean(Vec::new()),
            LogRead::Corrupt(reason) => {
                tracing::warn!(path = %self.path.display(), reason = %reason, "报警日志不可读，按空日志处理");
                Loaded::degraded(
                    Vec::new(),
                    RepositoryError::LogUnavailable {
                        path: self.path.display().to_string(),
                        reason,
                    },
                )
            }
        }
    }

    fn read_log(&self) -> LogRead {
        if !self.path.exists() {
            return LogRead::Missing;
        }

        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) => return LogRead::Corrupt(e.to_string()),
        };
        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(e) => return LogRead::Corrupt(format!("编码错误: {}", e)),
        };
        if content.trim().is_empty() {
            return LogRead::Ok(Vec::new());
        }

        match parse_log(&content) {
            Ok(records) => LogRead::Ok(records),
            Err(reason) => LogRead::Corrupt(reason),
        }
    }
}

// ==========================================
// 日志解析
// ==========================================

/// 列位置（兼容旧版西语表头: Fecha_Hora,Variable,Nivel,Descripción,Estado）
struct LogColumns {
    timestamp: usize,
    variable: usize,
    level: usize,
    description: usize,
    status: usize,
}

impl LogColumns {
    fn locate(headers: &csv::StringRecord) -> Result<Self, String> {
        let find = |aliases: &[&str]| -> Result<usize, String> {
            headers
                .iter()
                .position(|h| aliases.contains(&normalize_header(h).as_str()))
                .ok_or_else(|| format!("缺少列: {}", aliases[0]))
        };

        Ok(Self {
            timestamp: find(&["timestamp", "fecha_hora"])?,
            variable: find(&["variable"])?,
            level: find(&["level", "nivel"])?,
            description: find(&["description", "descripcion"])?,
            status: find(&["status", "estado"])?,
        })
    }
}

fn parse_log(content: &str) -> Result<Vec<AlarmRecord>, String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.trim_start_matches('\u{feff}').as_bytes());

    let headers = reader.headers().map_err(|e| e.to_string())?.clone();
    let columns = LogColumns::locate(&headers)?;

    let mut records = Vec::new();
    for (idx, row) in reader.records().enumerate() {
        let row = row.map_err(|e| e.to_string())?;
        let line = idx + 2;
        let cell = |i: usize| row.get(i).unwrap_or("").trim();

        let timestamp = NaiveDateTime::parse_from_str(cell(columns.timestamp), ALARM_TS_FORMAT)
            .map_err(|e| format!("第 {} 行时间格式错误: {}", line, e))?;
        let level = AlarmLevel::parse(cell(columns.level))
            .ok_or_else(|| format!("第 {} 行报警等级无效: {}", line, cell(columns.level)))?;
        let status = AlarmStatus::parse(cell(columns.status))
            .ok_or_else(|| format!("第 {} 行报警状态无效: {}", line, cell(columns.status)))?;
        let description = cell(columns.description);
        if description.is_empty() {
            return Err(format!("第 {} 行描述为空", line));
        }

        records.push(AlarmRecord {
            timestamp,
            variable: cell(columns.variable).to_string(),
            level,
            description: description.to_string(),
            status,
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests;
