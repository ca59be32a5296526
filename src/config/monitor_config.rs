// ==========================================
// 电机运行监测系统 - 生效配置
// ==========================================
// 职责: 汇总检测参数、分类阈值与存储路径
// 路径优先级: 显式参数 > config_kv > 数据目录默认文件名
// ==========================================

use crate::config::monitor_config_trait::MonitorConfigReader;
use crate::engine::{CauseThresholds, DetectorConfig};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::{Path, PathBuf};

pub const DEFAULT_READINGS_FILE: &str = "readings.csv";
pub const DEFAULT_ALARM_LOG_FILE: &str = "alarm_log.csv";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    pub detector: DetectorConfig,
    pub thresholds: CauseThresholds,
    pub readings_path: PathBuf,
    pub alarm_log_path: PathBuf,
}

impl MonitorConfig {
    /// 全部使用默认值，文件落在 data_dir 下
    pub fn with_data_dir(data_dir: &Path) -> Self {
        Self {
            detector: DetectorConfig::default(),
            thresholds: CauseThresholds::default(),
            readings_path: data_dir.join(DEFAULT_READINGS_FILE),
            alarm_log_path: data_dir.join(DEFAULT_ALARM_LOG_FILE),
        }
    }

    /// 从配置读取器装配
    pub async fn load<R>(reader: &R, data_dir: &Path) -> Result<Self, Box<dyn Error>>
    where
        R: MonitorConfigReader + ?Sized,
    {
        let detector = reader.get_detector_config().await?;
        let thresholds = reader.get_cause_thresholds().await?;
        let readings_path = reader
            .get_readings_path()
            .await?
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join(DEFAULT_READINGS_FILE));
        let alarm_log_path = reader
            .get_alarm_log_path()
            .await?
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join(DEFAULT_ALARM_LOG_FILE));

        Ok(Self {
            detector,
            thresholds,
            readings_path,
            alarm_log_path,
        })
    }

    pub fn with_readings_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.readings_path = path.into();
        self
    }

    pub fn with_alarm_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.alarm_log_path = path.into();
        self
    }
}
