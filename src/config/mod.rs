// ==========================================
// 电机运行监测系统 - 配置层
// ==========================================
// 职责: 检测参数、分类阈值与存储路径的配置管理
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod monitor_config;
pub mod monitor_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use monitor_config::{MonitorConfig, DEFAULT_ALARM_LOG_FILE, DEFAULT_READINGS_FILE};
pub use monitor_config_trait::MonitorConfigReader;
