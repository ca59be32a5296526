// ==========================================
// 电机运行监测系统 - 领域模型层
// ==========================================
// 职责: 定义读数、报警记录与领域类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod alarm;
pub mod reading;
pub mod types;

// 重导出核心类型
pub use alarm::{level_distribution, AlarmRecord, ALARM_TS_FORMAT, GENERAL_VARIABLE};
pub use reading::{Reading, ScoredReading};
pub use types::{AlarmLevel, AlarmStatus, ProbableCause, RiskLabel, SensorVariable};
