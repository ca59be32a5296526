// ==========================================
// 电机运行监测系统 - API 层
// ==========================================
// 职责: 提供监测业务接口，供命令行/定时任务调用
// ==========================================

pub mod error;
pub mod monitor_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use monitor_api::{AlarmSummary, MonitorApi, PassReport, DEFAULT_FAULT_PROBABILITY};
