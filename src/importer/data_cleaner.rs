// ==========================================
// 电机运行监测系统 - 数据清洗器实现
// ==========================================
// 职责: 区域格式数值解析 / 时间解析 / 取值范围校验
// 红线: 无法解析的单元格返回 None（缺失），不抛错、不置零
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};

pub struct DataCleaner;

impl DataCleaner {
    /// 解析区域格式数值
    ///
    /// 兼容:
    /// - 小数点 `.` 或 `,`（`18.5` / `18,5`）
    /// - 千分位（`1.234,5` / `1,234.5`，以最后出现的分隔符为小数点）
    /// - 空格 / 不换行空格千分位
    ///
    /// # 返回
    /// - Some(v): 有限且非负的数值
    /// - None: 空白、无法解析、NaN/无穷、负数
    pub fn parse_decimal(&self, raw: &str) -> Option<f64> {
        let compact: String = raw
            .trim()
            .trim_matches('"')
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '\u{a0}')
            .collect();
        if compact.is_empty() {
            return None;
        }

        let normalized = match (compact.rfind(','), compact.rfind('.')) {
            (Some(comma), Some(dot)) if comma > dot => compact.replace('.', "").replace(',', "."),
            (Some(_), Some(_)) => compact.replace(',', ""),
            (Some(_), None) => compact.replace(',', "."),
            _ => compact,
        };

        normalized
            .parse::<f64>()
            .ok()
            .and_then(|v| self.validate_reading(v))
    }

    /// 校验读数取值范围（有限且 ≥ 0）
    pub fn validate_reading(&self, value: f64) -> Option<f64> {
        if value.is_finite() && value >= 0.0 {
            Some(value)
        } else {
            None
        }
    }

    /// 解析时间戳（兼容常见导出格式，仅日期时取 00:00:00）
    pub fn parse_timestamp(&self, raw: &str) -> Option<NaiveDateTime> {
        let value = raw.trim();
        if value.is_empty() {
            return None;
        }

        const DATETIME_FORMATS: [&str; 5] = [
            "%Y-%m-%d %H:%M:%S",
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%d %H:%M",
            "%d/%m/%Y %H:%M:%S",
            "%d/%m/%Y %H:%M",
        ];
        for fmt in DATETIME_FORMATS {
            if let Ok(ts) = NaiveDateTime::parse_from_str(value, fmt) {
                return Some(ts);
            }
        }

        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(value, "%d/%m/%Y"))
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal_point_and_comma() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.parse_decimal("18.5"), Some(18.5));
        assert_eq!(cleaner.parse_decimal("18,5"), Some(18.5));
        assert_eq!(cleaner.parse_decimal("  42 "), Some(42.0));
        assert_eq!(cleaner.parse_decimal("\"90,2\""), Some(90.2));
    }

    #[test]
    fn test_parse_decimal_thousands() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.parse_decimal("1.234,5"), Some(1234.5));
        assert_eq!(cleaner.parse_decimal("1,234.5"), Some(1234.5));
        assert_eq!(cleaner.parse_decimal("1 234,5"), Some(1234.5));
    }

    #[test]
    fn test_parse_decimal_missing() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.parse_decimal(""), None);
        assert_eq!(cleaner.parse_decimal("n/a"), None);
        assert_eq!(cleaner.parse_decimal("abc"), None);
        assert_eq!(cleaner.parse_decimal("NaN"), None);
        assert_eq!(cleaner.parse_decimal("inf"), None);
        assert_eq!(cleaner.parse_decimal("-3.0"), None);
    }

    #[test]
    fn test_parse_timestamp() {
        let cleaner = DataCleaner;
        let ts = cleaner.parse_timestamp("2025-01-20 08:15:00").unwrap();
        assert_eq!(ts.to_string(), "2025-01-20 08:15:00");

        let ts = cleaner.parse_timestamp("2025-01-20T08:15:00").unwrap();
        assert_eq!(ts.to_string(), "2025-01-20 08:15:00");

        let ts = cleaner.parse_timestamp("20/01/2025").unwrap();
        assert_eq!(ts.to_string(), "2025-01-20 00:00:00");

        assert!(cleaner.parse_timestamp("yesterday").is_none());
    }
}
