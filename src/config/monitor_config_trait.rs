// ==========================================
// 电机运行监测系统 - 监测配置读取 Trait
// ==========================================
// 职责: 定义检测/分类/存储所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::engine::{CauseThresholds, DetectorConfig};
use async_trait::async_trait;
use std::error::Error;

// ==========================================
// MonitorConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait MonitorConfigReader: Send + Sync {
    /// 获取异常检测参数
    ///
    /// # 默认值
    /// - contamination: 0.5
    /// - random_seed: 42
    /// - n_estimators: 100
    /// - max_samples: 256
    async fn get_detector_config(&self) -> Result<DetectorConfig, Box<dyn Error>>;

    /// 获取原因分类阈值
    ///
    /// # 默认值
    /// - current_max 16 / pressure_min 80 / temp_max 63 / torque_max 150
    async fn get_cause_thresholds(&self) -> Result<CauseThresholds, Box<dyn Error>>;

    /// 读数表路径（未配置返回 None）
    async fn get_readings_path(&self) -> Result<Option<String>, Box<dyn Error>>;

    /// 报警日志路径（未配置返回 None）
    async fn get_alarm_log_path(&self) -> Result<Option<String>, Box<dyn Error>>;
}
