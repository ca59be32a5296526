// ==========================================
// 电机运行监测系统 - 字段映射器
// ==========================================
// 职责: 原始行 (表头 → 文本) 映射为 Reading
// 规则:
// - 表头按 SensorVariable::from_header 识别，未识别列忽略
// - 单元格经 DataCleaner 解析，失败即缺失
// - 无任何有效数值的行被剔除
// ==========================================

use crate::domain::reading::Reading;
use crate::domain::types::{normalize_header, SensorVariable};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::parser_trait::RawRecord;

/// 映射结果
#[derive(Debug, Clone, Default)]
pub struct MappedReadings {
    pub readings: Vec<Reading>,
    pub skipped_rows: usize, // 无有效数值被剔除的行数
}

/// 表头 → 变量 的解析结果
#[derive(Debug, Clone, Default)]
struct ColumnBinding {
    sensors: Vec<(String, SensorVariable)>,
    timestamp: Option<String>,
}

pub struct FieldMapper {
    cleaner: DataCleaner,
}

impl Default for FieldMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldMapper {
    pub fn new() -> Self {
        Self {
            cleaner: DataCleaner,
        }
    }

    /// 批量映射原始行
    ///
    /// # 错误
    /// - MissingSensorColumns: 表中有数据行，但没有任何可识别的传感器列
    pub fn map_records(&self, records: &[RawRecord]) -> ImportResult<MappedReadings> {
        let first = match records.first() {
            Some(first) => first,
            None => return Ok(MappedReadings::default()),
        };

        let binding = Self::bind_columns(first.keys());
        if binding.sensors.is_empty() {
            let mut headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
            headers.sort_unstable();
            return Err(ImportError::MissingSensorColumns(headers.join(", ")));
        }

        let mut mapped = MappedReadings::default();
        for (row_idx, record) in records.iter().enumerate() {
            let reading = self.map_record(record, &binding);
            if reading.has_any_value() {
                mapped.readings.push(reading);
            } else {
                tracing::debug!(row = row_idx + 1, "读数行无有效数值，已剔除");
                mapped.skipped_rows += 1;
            }
        }

        Ok(mapped)
    }

    fn map_record(&self, record: &RawRecord, binding: &ColumnBinding) -> Reading {
        let mut reading = Reading::default();
        for (header, variable) in &binding.sensors {
            let value = record
                .get(header)
                .and_then(|raw| self.cleaner.parse_decimal(raw));
            reading.set_value(*variable, value);
        }
        reading.timestamp = binding
            .timestamp
            .as_ref()
            .and_then(|header| record.get(header))
            .and_then(|raw| self.cleaner.parse_timestamp(raw));
        reading
    }

    /// 解析表头绑定（同一变量出现多列时取排序后的第一列，保证确定性）
    fn bind_columns<'a>(headers: impl Iterator<Item = &'a String>) -> ColumnBinding {
        let mut sorted: Vec<&String> = headers.collect();
        sorted.sort();

        let mut binding = ColumnBinding::default();
        for header in sorted {
            if let Some(variable) = SensorVariable::from_header(header) {
                if !binding.sensors.iter().any(|(_, v)| *v == variable) {
                    binding.sensors.push((header.clone(), variable));
                }
            } else if binding.timestamp.is_none()
                && matches!(
                    normalize_header(header).as_str(),
                    "timestamp" | "time" | "fecha_hora" | "fecha"
                )
            {
                binding.timestamp = Some(header.clone());
            }
        }
        binding
    }
}
