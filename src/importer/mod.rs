// ==========================================
// 电机运行监测系统 - 导入层
// ==========================================
// 职责: 外部表格解析、区域格式清洗、表头映射、样本与模拟数据
// 支持: CSV (逗号/分号分隔), Excel
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod parser_trait;
pub mod sample;
pub mod simulator;

// 重导出核心类型
pub use data_cleaner::DataCleaner;
pub use error::{ImportError, ImportResult};
pub use field_mapper::{FieldMapper, MappedReadings};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use parser_trait::{FileParser, RawRecord};
pub use sample::builtin_sample;
pub use simulator::{history_series, FaultKind, HistoryPoint, ReadingSimulator};
