// ==========================================
// 电机运行监测系统 - 文件解析 Trait
// ==========================================
// 职责: 定义表格文件解析接口（不包含字段映射）
// ==========================================

use crate::importer::error::ImportResult;
use std::collections::HashMap;
use std::path::Path;

/// 原始行: 表头 → 单元格文本（已 TRIM）
pub type RawRecord = HashMap<String, String>;

// ==========================================
// FileParser Trait
// ==========================================
// 实现者: CsvParser / ExcelParser
pub trait FileParser {
    /// 将表格文件解析为原始行
    ///
    /// # 返回
    /// - 跳过完全空白的行
    /// - 保留表头原文（去首尾空白）
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRecord>>;
}
