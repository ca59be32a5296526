// ==========================================
// 电机运行监测系统 - 可能原因分类引擎
// ==========================================
// 规则（仅 Risk 时按序评估，首个命中即返回）:
// 1. 电流 > current_max       → 电流过载
// 2. 液压 < pressure_min      → 液压过低（泄漏）
// 3. 油温 > temp_max          → 油温过高
// 4. 扭矩 > torque_max        → 扭矩偏高（摩擦）
// 5. 其余                     → 未分类异常
// Normal → 无异常
// 红线: 纯函数，缺失读数不触发其规则
// ==========================================

use crate::domain::reading::Reading;
use crate::domain::types::{ProbableCause, RiskLabel};
use crate::engine::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};

// ==========================================
// CauseThresholds - 分类阈值
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CauseThresholds {
    pub current_max: f64,  // 电流上限 (A)
    pub pressure_min: f64, // 液压下限 (bar)
    pub temp_max: f64,     // 油温上限 (°C)
    pub torque_max: f64,   // 扭矩上限 (N·m)
}

impl Default for CauseThresholds {
    fn default() -> Self {
        Self {
            current_max: 16.0,
            pressure_min: 80.0,
            temp_max: 63.0,
            torque_max: 150.0,
        }
    }
}

impl CauseThresholds {
    /// 校验: 每个阈值必须为有限正数
    pub fn validate(&self) -> EngineResult<()> {
        let bounds = [
            ("current_max", self.current_max),
            ("pressure_min", self.pressure_min),
            ("temp_max", self.temp_max),
            ("torque_max", self.torque_max),
        ];
        for (name, value) in bounds {
            if !(value.is_finite() && value > 0.0) {
                return Err(EngineError::InvalidParameter {
                    name,
                    value: value.to_string(),
                    reason: "阈值必须为有限正数",
                });
            }
        }
        Ok(())
    }
}

// ==========================================
// CauseClassifier - 可能原因分类引擎
// ==========================================
#[derive(Debug, Clone)]
pub struct CauseClassifier {
    thresholds: CauseThresholds,
}

impl CauseClassifier {
    pub fn new(thresholds: CauseThresholds) -> EngineResult<Self> {
        thresholds.validate()?;
        Ok(Self { thresholds })
    }

    pub fn thresholds(&self) -> &CauseThresholds {
        &self.thresholds
    }

    /// 判定可能原因
    pub fn classify(&self, reading: &Reading, risk: RiskLabel) -> ProbableCause {
        if !risk.is_risk() {
            return ProbableCause::NoAnomaly;
        }

        let t = &self.thresholds;
        let above = |value: Option<f64>, bound: f64| value.map_or(false, |v| v > bound);
        let below = |value: Option<f64>, bound: f64| value.map_or(false, |v| v < bound);

        if above(reading.current_a, t.current_max) {
            ProbableCause::ElectricalOverload
        } else if below(reading.hydraulic_pressure_bar, t.pressure_min) {
            ProbableCause::LowPressureLeak
        } else if above(reading.oil_temperature_c, t.temp_max) {
            ProbableCause::Overheating
        } else if above(reading.torque_nm, t.torque_max) {
            ProbableCause::ElevatedTorque
        } else {
            ProbableCause::Unclassified
        }
    }
}

impl Default for CauseClassifier {
    fn default() -> Self {
        Self {
            thresholds: CauseThresholds::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> CauseClassifier {
        CauseClassifier::default()
    }

    #[test]
    fn test_normal_is_no_anomaly_regardless_of_values() {
        let r = Reading::new(99.0, 999.0, 1.0, 150.0);
        assert_eq!(classifier().classify(&r, RiskLabel::Normal), ProbableCause::NoAnomaly);
    }

    #[test]
    fn test_rule_order_current_first() {
        // 所有规则同时越界时，电流规则优先
        let r = Reading::new(20.0, 200.0, 50.0, 90.0);
        assert_eq!(
            classifier().classify(&r, RiskLabel::Risk),
            ProbableCause::ElectricalOverload
        );
    }

    #[test]
    fn test_rule_order_pressure_before_temperature_and_torque() {
        let r = Reading::new(12.0, 200.0, 70.0, 90.0);
        assert_eq!(
            classifier().classify(&r, RiskLabel::Risk),
            ProbableCause::LowPressureLeak
        );
    }

    #[test]
    fn test_rule_order_temperature_before_torque() {
        let r = Reading::new(12.0, 200.0, 85.0, 70.0);
        assert_eq!(classifier().classify(&r, RiskLabel::Risk), ProbableCause::Overheating);
    }

    #[test]
    fn test_torque_rule() {
        let r = Reading::new(12.0, 160.0, 85.0, 60.0);
        assert_eq!(
            classifier().classify(&r, RiskLabel::Risk),
            ProbableCause::ElevatedTorque
        );
    }

    #[test]
    fn test_unclassified_and_boundaries_are_exclusive() {
        // 恰好等于阈值不触发
        let r = Reading::new(16.0, 150.0, 80.0, 63.0);
        assert_eq!(
            classifier().classify(&r, RiskLabel::Risk),
            ProbableCause::Unclassified
        );
    }

    #[test]
    fn test_missing_value_never_fires() {
        let mut r = Reading::new(12.0, 160.0, 85.0, 60.0);
        r.current_a = None;
        r.hydraulic_pressure_bar = None;
        assert_eq!(
            classifier().classify(&r, RiskLabel::Risk),
            ProbableCause::ElevatedTorque
        );
        assert_eq!(
            classifier().classify(&Reading::default(), RiskLabel::Risk),
            ProbableCause::Unclassified
        );
    }

    #[test]
    fn test_classify_is_idempotent() {
        let c = classifier();
        let r = Reading::new(18.5, 160.4, 90.2, 68.4);
        assert_eq!(c.classify(&r, RiskLabel::Risk), c.classify(&r, RiskLabel::Risk));
    }

    #[test]
    fn test_custom_thresholds() {
        let c = CauseClassifier::new(CauseThresholds {
            current_max: 18.0,
            temp_max: 70.0,
            ..CauseThresholds::default()
        })
        .unwrap();
        let r = Reading::new(17.0, 140.0, 85.0, 68.0);
        assert_eq!(c.classify(&r, RiskLabel::Risk), ProbableCause::Unclassified);
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        let result = CauseClassifier::new(CauseThresholds {
            pressure_min: 0.0,
            ..CauseThresholds::default()
        });
        assert!(matches!(
            result,
            Err(EngineError::InvalidParameter { name: "pressure_min", .. })
        ));

        let result = CauseClassifier::new(CauseThresholds {
            temp_max: f64::NAN,
            ..CauseThresholds::default()
        });
        assert!(result.is_err());
    }
}
