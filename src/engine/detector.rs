// ==========================================
// 电机运行监测系统 - 异常检测引擎
// ==========================================
// 输入: 整批读数（批量联合判定，非流式）
// 输出: 每条读数一个 Normal / Risk 标签
// 规则:
// - 特征列 = 全批次无缺失的传感器列
// - 每次调用在当前批次上重新训练隔离森林
// - 按异常分降序取前 round(c·N) 行为 Risk，同分按输入顺序
// 红线: 无可用特征时在产生任何标签前返回 NoValidFeatures
// ==========================================

use crate::domain::reading::Reading;
use crate::domain::types::{RiskLabel, SensorVariable};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::isolation_forest::{ForestParams, IsolationForest};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, instrument};

// ==========================================
// DetectorConfig - 检测参数
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    pub contamination: f64, // 预期异常比例 c ∈ (0, 1)
    pub seed: u64,
    pub n_estimators: usize,
    pub max_samples: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            contamination: 0.5,
            seed: 42,
            n_estimators: 100,
            max_samples: 256,
        }
    }
}

impl DetectorConfig {
    pub fn validate(&self) -> EngineResult<()> {
        if !(self.contamination > 0.0 && self.contamination < 1.0) {
            return Err(EngineError::InvalidParameter {
                name: "contamination",
                value: self.contamination.to_string(),
                reason: "必须位于开区间 (0, 1)",
            });
        }
        if self.n_estimators == 0 {
            return Err(EngineError::InvalidParameter {
                name: "n_estimators",
                value: "0".to_string(),
                reason: "至少需要一棵树",
            });
        }
        if self.max_samples == 0 {
            return Err(EngineError::InvalidParameter {
                name: "max_samples",
                value: "0".to_string(),
                reason: "抽样数必须大于 0",
            });
        }
        Ok(())
    }
}

/// 检测明细（标签 + 异常分 + 参与训练的特征列）
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionResult {
    pub labels: Vec<RiskLabel>,
    pub scores: Vec<f64>,
    pub features: Vec<SensorVariable>,
}

impl DetectionResult {
    pub fn risk_count(&self) -> usize {
        self.labels.iter().filter(|l| l.is_risk()).count()
    }
}

// ==========================================
// AnomalyDetector - 异常检测引擎
// ==========================================
#[derive(Debug, Clone)]
pub struct AnomalyDetector {
    config: DetectorConfig,
}

impl AnomalyDetector {
    pub fn new(config: DetectorConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// 全批次数值完整的特征列（按固定列序）
    pub fn feature_columns(readings: &[Reading]) -> Vec<SensorVariable> {
        if readings.is_empty() {
            return Vec::new();
        }
        SensorVariable::ALL
            .iter()
            .copied()
            .filter(|&var| readings.iter().all(|r| r.value(var).is_some()))
            .collect()
    }

    /// 批量判定，每条输入一个标签
    pub fn score(&self, readings: &[Reading]) -> EngineResult<Vec<RiskLabel>> {
        Ok(self.score_detailed(readings)?.labels)
    }

    #[instrument(skip(self, readings), fields(rows = readings.len(), contamination = self.config.contamination))]
    pub fn score_detailed(&self, readings: &[Reading]) -> EngineResult<DetectionResult> {
        let features = Self::feature_columns(readings);
        if features.is_empty() {
            return Err(EngineError::NoValidFeatures {
                rows: readings.len(),
            });
        }

        let matrix: Vec<Vec<f64>> = readings
            .iter()
            .map(|r| {
                features
                    .iter()
                    .map(|&var| r.value(var).unwrap_or_default())
                    .collect()
            })
            .collect();

        let forest = IsolationForest::fit(
            &matrix,
            ForestParams {
                n_estimators: self.config.n_estimators,
                max_samples: self.config.max_samples,
                seed: self.config.seed,
            },
        );
        let scores = forest.score_samples(&matrix);
        let labels = label_top_k(&scores, self.risk_quota(readings.len()));

        debug!(
            features = features.len(),
            risk = labels.iter().filter(|l| l.is_risk()).count(),
            "异常检测完成"
        );

        Ok(DetectionResult {
            labels,
            scores,
            features,
        })
    }

    /// Risk 行数 = round(c·N)，限制在 [0, N]
    pub fn risk_quota(&self, rows: usize) -> usize {
        let k = (self.config.contamination * rows as f64).round();
        (k.max(0.0) as usize).min(rows)
    }
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self {
            config: DetectorConfig::default(),
        }
    }
}

fn label_top_k(scores: &[f64], k: usize) -> Vec<RiskLabel> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    });

    let mut labels = vec![RiskLabel::Normal; scores.len()];
    for &i in order.iter().take(k) {
        labels[i] = RiskLabel::Risk;
    }
    labels
}
