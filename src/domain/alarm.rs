// ==========================================
// 电机运行监测系统 - 报警记录领域模型
// ==========================================
// 红线: 报警记录创建后不可修改，只追加不淘汰
// 对齐: 报警日志表头 timestamp,variable,level,description,status
// ==========================================

use crate::domain::types::{AlarmLevel, AlarmStatus, ProbableCause};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 无法定位具体越界变量时的 variable 取值
pub const GENERAL_VARIABLE: &str = "General";

/// 报警日志时间格式
pub const ALARM_TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ==========================================
// AlarmRecord - 报警记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlarmRecord {
    pub timestamp: NaiveDateTime, // 评分时间
    pub variable: String,         // 越界变量列名 或 "General"
    pub level: AlarmLevel,        // 报警等级
    pub description: String,      // 可能原因
    pub status: AlarmStatus,      // 处理状态
}

impl AlarmRecord {
    /// 由分类结果生成一条待处理的高等级报警
    pub fn from_cause(cause: ProbableCause, timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            variable: cause
                .variable()
                .map(|v| v.column_name().to_string())
                .unwrap_or_else(|| GENERAL_VARIABLE.to_string()),
            level: AlarmLevel::High,
            description: cause.label().to_string(),
            status: AlarmStatus::Pending,
        }
    }
}

/// 按等级统计报警数量
pub fn level_distribution(records: &[AlarmRecord]) -> BTreeMap<AlarmLevel, usize> {
    let mut dist = BTreeMap::new();
    for record in records {
        *dist.entry(record.level).or_insert(0) += 1;
    }
    dist
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_from_cause_sets_variable() {
        let alarm = AlarmRecord::from_cause(ProbableCause::Overheating, ts());
        assert_eq!(alarm.variable, "oil_temperature (°C)");
        assert_eq!(alarm.level, AlarmLevel::High);
        assert_eq!(alarm.status, AlarmStatus::Pending);
        assert_eq!(alarm.description, "high temperature — overheating risk");

        let general = AlarmRecord::from_cause(ProbableCause::Unclassified, ts());
        assert_eq!(general.variable, GENERAL_VARIABLE);
    }

    #[test]
    fn test_level_distribution() {
        let mut low = AlarmRecord::from_cause(ProbableCause::ElevatedTorque, ts());
        low.level = AlarmLevel::Low;
        let records = vec![
            AlarmRecord::from_cause(ProbableCause::ElectricalOverload, ts()),
            AlarmRecord::from_cause(ProbableCause::LowPressureLeak, ts()),
            low,
        ];
        let dist = level_distribution(&records);
        assert_eq!(dist.get(&AlarmLevel::High), Some(&2));
        assert_eq!(dist.get(&AlarmLevel::Low), Some(&1));
        assert_eq!(dist.get(&AlarmLevel::Medium), None);
    }
}
