// ==========================================
// 电机运行监测系统 - 读数表仓储
// ==========================================
// 职责: 读数表加载（缺失/损坏回退内置样本）与追加（全量重写）
// 红线: 追加为 "读取 - 修改 - 全量写回"，必须持有 `<file>.lock` 排他锁
// ==========================================

use crate::domain::alarm::ALARM_TS_FORMAT;
use crate::domain::reading::Reading;
use crate::domain::types::SensorVariable;
use crate::importer::{builtin_sample, FieldMapper, UniversalFileParser};
use crate::repository::error::{Loaded, RepositoryError, RepositoryResult};
use crate::repository::file_store::{quarantine_corrupt, rewrite_csv, with_file_lock};
use std::path::{Path, PathBuf};

/// 时间戳列表头
pub const TIMESTAMP_COLUMN: &str = "timestamp";

/// 读取结果（区分 "文件不存在" 与 "文件损坏"）
enum TableRead {
    Missing,
    Corrupt(String),
    Ok(Vec<Reading>),
}

// ==========================================
// ReadingRepository - 读数表仓储
// ==========================================
pub struct ReadingRepository {
    path: PathBuf,
}

impl ReadingRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_excel(&self) -> bool {
        self.path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| matches!(ext.to_lowercase().as_str(), "xlsx" | "xls"))
    }

    // ==========================================
    // 读取
    // ==========================================

    /// 加载读数表
    ///
    /// # 返回
    /// - 文件可读: 表中读数（无有效数值的行已剔除）
    /// - 文件缺失 / 损坏: 内置 10 行样本 + SourceUnavailable 告警
    pub fn load(&self) -> Loaded<Vec<Reading>> {
        self.resolve(self.read_table())
    }

    fn resolve(&self, read: TableRead) -> Loaded<Vec<Reading>> {
        match read {
            TableRead::Ok(readings) => {
                tracing::info!(path = %self.path.display(), rows = readings.len(), "读数表加载完成");
                Loaded::clean(readings)
            }
            TableRead::Missing => self.fallback("文件不存在".to_string()),
            TableRead::Corrupt(reason) => self.fallback(reason),
        }
    }

    fn fallback(&self, reason: String) -> Loaded<Vec<Reading>> {
        tracing::warn!(path = %self.path.display(), reason = %reason, "读数表不可用，使用内置样本");
        Loaded::degraded(
            builtin_sample(),
            RepositoryError::SourceUnavailable {
                path: self.path.display().to_string(),
                reason,
            },
        )
    }

    fn read_table(&self) -> TableRead {
        if !self.path.exists() {
            return TableRead::Missing;
        }

        let records = match UniversalFileParser.parse(&self.path) {
            Ok(records) => records,
            Err(e) => return TableRead::Corrupt(e.to_string()),
        };

        match FieldMapper::new().map_records(&records) {
            Ok(mapped) => {
                if mapped.skipped_rows > 0 {
                    tracing::debug!(skipped = mapped.skipped_rows, "剔除无有效数值的读数行");
                }
                TableRead::Ok(mapped.readings)
            }
            Err(e) => TableRead::Corrupt(e.to_string()),
        }
    }

    // ==========================================
    // 写入
    // ==========================================

    /// 追加一条读数并全量写回
    ///
    /// # 返回
    /// - Ok(Loaded<usize>): 写回后的总行数，附带加载阶段的告警
    pub fn append(&self, reading: Reading) -> RepositoryResult<Loaded<usize>> {
        self.append_many(&[reading])
    }

    /// 批量追加读数并全量写回
    ///
    /// 表不存在时，写回内容为 "内置样本 + 新读数"（与 load 所见一致）；
    /// 表损坏时，原文件先移至旁路文件再写回。
    pub fn append_many(&self, readings: &[Reading]) -> RepositoryResult<Loaded<usize>> {
        if self.is_excel() {
            return Err(RepositoryError::FileWriteError(format!(
                "Excel 读数表只读，无法追加: {}",
                self.path.display()
            )));
        }

        with_file_lock(&self.path, || {
            let read = self.read_table();
            let corrupt = matches!(read, TableRead::Corrupt(_));
            let mut table = self.resolve(read);
            if corrupt {
                quarantine_corrupt(&self.path)?;
            }

            table.data.extend_from_slice(readings);
            self.write_snapshot(&table.data)?;

            tracing::info!(
                path = %self.path.display(),
                appended = readings.len(),
                total = table.data.len(),
                "读数表已追加并写回"
            );
            Ok(table.map(|all| all.len()))
        })
    }

    /// 全量写回（标准表头、逗号分隔、小数点为 `.`）
    pub fn write_snapshot(&self, readings: &[Reading]) -> RepositoryResult<()> {
        rewrite_csv(&self.path, |writer| {
            let mut header: Vec<&str> = SensorVariable::ALL.iter().map(|v| v.column_name()).collect();
            header.push(TIMESTAMP_COLUMN);
            writer.write_record(&header)?;

            for reading in readings {
                let mut row: Vec<String> = SensorVariable::ALL
                    .iter()
                    .map(|v| reading.value(*v).map(|x| x.to_string()).unwrap_or_default())
                    .collect();
                row.push(
                    reading
                        .timestamp
                        .map(|ts| ts.format(ALARM_TS_FORMAT).to_string())
                        .unwrap_or_default(),
                );
                writer.write_record(&row)?;
            }
            Ok(())
        })
    }
}
