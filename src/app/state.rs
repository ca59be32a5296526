// ==========================================
// 电机运行监测系统 - 应用状态
// ==========================================
// 职责: 数据目录定位、配置库打开、API 实例装配
// ==========================================

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::api::{ApiError, ApiResult, MonitorApi};
use crate::config::{ConfigManager, MonitorConfig};

/// 数据目录环境变量
pub const HOME_ENV: &str = "MOTOR_MONITOR_HOME";

/// 配置库文件名
pub const CONFIG_DB_FILE: &str = "motor_monitor.db";

/// 应用状态
///
/// 包含配置管理器与监测API，供命令行各子命令共享
pub struct AppState {
    /// 数据目录
    pub data_dir: PathBuf,

    /// 配置管理器（config_kv）
    pub config_manager: Arc<ConfigManager>,

    /// 生效配置
    pub config: MonitorConfig,

    /// 监测API
    pub monitor_api: Arc<MonitorApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - data_dir: 数据目录（配置库与默认表格所在目录）
    /// - overrides: 对已加载配置的覆写（命令行参数）
    pub async fn new<F>(data_dir: PathBuf, overrides: F) -> ApiResult<Self>
    where
        F: FnOnce(MonitorConfig) -> MonitorConfig,
    {
        tracing::info!("初始化AppState，数据目录: {}", data_dir.display());

        std::fs::create_dir_all(&data_dir)
            .map_err(|e| ApiError::StorageError(format!("无法创建数据目录: {}", e)))?;

        let db_path = data_dir.join(CONFIG_DB_FILE);
        let config_manager = Arc::new(ConfigManager::new(&db_path.to_string_lossy())?);

        let config = overrides(MonitorConfig::load(config_manager.as_ref(), &data_dir).await?);
        let monitor_api = Arc::new(MonitorApi::from_config(config.clone())?);

        tracing::info!(
            readings = %config.readings_path.display(),
            alarm_log = %config.alarm_log_path.display(),
            "AppState初始化成功"
        );

        Ok(Self {
            data_dir,
            config_manager,
            config,
            monitor_api,
        })
    }

    /// 配置库路径
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(CONFIG_DB_FILE)
    }
}

/// 默认数据目录
///
/// 优先级: MOTOR_MONITOR_HOME > 用户数据目录/motor-monitor > ./motor-monitor
pub fn get_default_data_dir() -> PathBuf {
    if let Ok(path) = std::env::var(HOME_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    match dirs::data_dir() {
        Some(dir) => dir.join(app_dir_name()),
        None => Path::new(".").join(app_dir_name()),
    }
}

fn app_dir_name() -> &'static str {
    // 开发环境使用独立目录，避免污染生产数据
    if cfg!(debug_assertions) {
        "motor-monitor-dev"
    } else {
        "motor-monitor"
    }
}
