// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

use async_trait::async_trait;
use motor_monitor::config::MonitorConfigReader;
use motor_monitor::engine::{CauseThresholds, DetectorConfig};
use std::error::Error;

/// Mock 配置结构
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    pub detector: DetectorConfig,
    pub thresholds: CauseThresholds,
    pub readings_path: Option<String>,
    pub alarm_log_path: Option<String>,
}

impl MockConfig {
    /// 自定义异常比例
    pub fn with_contamination(contamination: f64) -> Self {
        let mut config = Self::default();
        config.detector.contamination = contamination;
        config
    }

    /// 旧版现场阈值（电流 18 A，油温 70 °C）
    pub fn legacy_thresholds() -> Self {
        let mut config = Self::default();
        config.thresholds.current_max = 18.0;
        config.thresholds.temp_max = 70.0;
        config
    }
}

#[async_trait]
impl MonitorConfigReader for MockConfig {
    async fn get_detector_config(&self) -> Result<DetectorConfig, Box<dyn Error>> {
        Ok(self.detector)
    }

    async fn get_cause_thresholds(&self) -> Result<CauseThresholds, Box<dyn Error>> {
        Ok(self.thresholds)
    }

    async fn get_readings_path(&self) -> Result<Option<String>, Box<dyn Error>> {
        Ok(self.readings_path.clone())
    }

    async fn get_alarm_log_path(&self) -> Result<Option<String>, Box<dyn Error>> {
        Ok(self.alarm_log_path.clone())
    }
}
