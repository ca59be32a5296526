// ==========================================
// 电机运行监测系统 - 数据仓储层
// ==========================================
// 职责: 读数表与报警日志的文件持久化
// 红线: 仓储不做业务逻辑,只做数据映射；追加必须串行化
// ==========================================

pub mod alarm_log_repo;
pub mod error;
pub mod file_store;
pub mod reading_repo;

// 重导出核心类型
pub use alarm_log_repo::{AlarmLogRepository, ALARM_LOG_HEADER};
pub use error::{Loaded, RepositoryError, RepositoryResult};
pub use reading_repo::ReadingRepository;
