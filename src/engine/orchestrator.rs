// ==========================================
// 电机运行监测系统 - 引擎编排器
// ==========================================
// 用途: 串联 异常检测 → 原因分类
// 红线: 检测失败时不产生任何分类结果
// ==========================================

use crate::domain::reading::{Reading, ScoredReading};
use crate::engine::classifier::{CauseClassifier, CauseThresholds};
use crate::engine::detector::{AnomalyDetector, DetectorConfig};
use crate::engine::error::EngineResult;
use tracing::{info, instrument};

// ==========================================
// MonitorOrchestrator - 引擎编排器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct MonitorOrchestrator {
    detector: AnomalyDetector,
    classifier: CauseClassifier,
}

impl MonitorOrchestrator {
    /// 创建编排器（参数校验失败返回 InvalidParameter）
    pub fn new(detector: DetectorConfig, thresholds: CauseThresholds) -> EngineResult<Self> {
        Ok(Self {
            detector: AnomalyDetector::new(detector)?,
            classifier: CauseClassifier::new(thresholds)?,
        })
    }

    pub fn detector(&self) -> &AnomalyDetector {
        &self.detector
    }

    pub fn classifier(&self) -> &CauseClassifier {
        &self.classifier
    }

    /// 检测 + 分类，输出与输入一一对应且顺序一致
    #[instrument(skip(self, readings), fields(rows = readings.len()))]
    pub fn score_and_classify(&self, readings: &[Reading]) -> EngineResult<Vec<ScoredReading>> {
        let detection = self.detector.score_detailed(readings)?;

        let scored: Vec<ScoredReading> = readings
            .iter()
            .zip(detection.labels.iter().zip(detection.scores.iter()))
            .map(|(reading, (&risk, &anomaly_score))| ScoredReading {
                reading: *reading,
                risk,
                cause: self.classifier.classify(reading, risk),
                anomaly_score,
            })
            .collect();

        info!(
            total = scored.len(),
            risk = detection.risk_count(),
            "检测与分类完成"
        );
        Ok(scored)
    }
}
