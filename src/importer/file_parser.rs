// ==========================================
// 电机运行监测系统 - 文件解析器实现
// ==========================================
// 支持: CSV (.csv, 逗号或分号分隔) / Excel (.xlsx/.xls)
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::parser_trait::{FileParser, RawRecord};
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::path::Path;

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl CsvParser {
    /// 根据表头行探测字段分隔符
    ///
    /// 分号数量不少于逗号时视为分号分隔（欧洲区域格式，小数点为逗号）
    pub fn sniff_delimiter(header_line: &str) -> u8 {
        let semicolons = header_line.matches(';').count();
        let commas = header_line.matches(',').count();
        if semicolons > 0 && semicolons >= commas {
            b';'
        } else {
            b','
        }
    }

    /// 从内存文本解析（便于测试与复用）
    pub fn parse_str(&self, content: &str) -> ImportResult<Vec<RawRecord>> {
        let content = content.trim_start_matches('\u{feff}');
        let header_line = content.lines().next().unwrap_or("");
        let delimiter = Self::sniff_delimiter(header_line);

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(delimiter)
            .flexible(true) // 允许行长度不一致
            .from_reader(content.as_bytes());

        // 读取表头
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        // 读取所有行
        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;
            let mut row_map = HashMap::new();

            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row_map.insert(header.clone(), value.trim().to_string());
                }
            }

            // 跳过完全空白的行
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }

            records.push(row_map);
        }

        Ok(records)
    }
}

impl FileParser for CsvParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRecord>> {
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        // 兼容非 UTF-8 导出（如 Windows-1252），无法解码的字节替换后继续
        let bytes = std::fs::read(file_path)?;
        let content = String::from_utf8_lossy(&bytes);
        self.parse_str(&content)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRecord>> {
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        let mut workbook = open_workbook_auto(file_path)?;

        // 读取第一个 sheet
        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;
        let range = workbook.worksheet_range(&sheet_name)?;

        // 提取表头（第一行）
        let mut rows = range.rows();
        let header_row = match rows.next() {
            Some(row) => row,
            None => return Ok(Vec::new()),
        };

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        // 读取数据行
        let mut records = Vec::new();
        for data_row in rows {
            let mut row_map = HashMap::new();

            for (col_idx, cell) in data_row.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row_map.insert(header.clone(), cell.to_string().trim().to_string());
                }
            }

            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }

            records.push(row_map);
        }

        Ok(records)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Vec<RawRecord>> {
        let path = file_path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            // 无扩展名的导出文件按 CSV 处理
            "csv" | "txt" | "" => CsvParser.parse_to_raw_records(path),
            "xlsx" | "xls" => ExcelParser.parse_to_raw_records(path),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_sniff_delimiter() {
        assert_eq!(CsvParser::sniff_delimiter("a,b,c"), b',');
        assert_eq!(CsvParser::sniff_delimiter("a;b;c"), b';');
        assert_eq!(CsvParser::sniff_delimiter("single"), b',');
    }

    #[test]
    fn test_csv_parser_comma_file() {
        let mut temp_file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(temp_file, "current (A),torque (N·m)").unwrap();
        writeln!(temp_file, "12.5,150.1").unwrap();
        writeln!(temp_file, "13.0,149.0").unwrap();

        let records = CsvParser.parse_to_raw_records(temp_file.path()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("current (A)"), Some(&"12.5".to_string()));
        assert_eq!(records[1].get("torque (N·m)"), Some(&"149.0".to_string()));
    }

    #[test]
    fn test_csv_parser_semicolon_with_decimal_comma() {
        let records = CsvParser
            .parse_str("Corriente_motor (A);Torque (Nm)\n18,5;160,4\n")
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("Corriente_motor (A)"), Some(&"18,5".to_string()));
        assert_eq!(records[0].get("Torque (Nm)"), Some(&"160,4".to_string()));
    }

    #[test]
    fn test_csv_parser_strips_bom_and_skips_empty_rows() {
        let records = CsvParser
            .parse_str("\u{feff}current (A),torque (N·m)\n12.0,150.0\n,\n11.0,149.0\n")
            .unwrap();

        assert_eq!(records.len(), 2);
        assert!(records[0].contains_key("current (A)"));
    }

    #[test]
    fn test_csv_parser_file_not_found() {
        let result = CsvParser.parse_to_raw_records(Path::new("non_existent.csv"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_universal_parser_rejects_unknown_extension() {
        let result = UniversalFileParser.parse("readings.parquet");
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
    }
}
