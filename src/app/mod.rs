// ==========================================
// 电机运行监测系统 - 应用层
// ==========================================
// 职责: 数据目录与共享状态装配
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_data_dir, AppState, CONFIG_DB_FILE, HOME_ENV};
