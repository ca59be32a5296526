// ==========================================
// 电机运行监测系统 - 传感器读数领域模型
// ==========================================
// 职责: 单条读数 (Reading) 与评分后读数 (ScoredReading)
// 红线: 缺失值保持为 None，不得以 0 代替
// ==========================================

use crate::domain::types::{ProbableCause, RiskLabel, SensorVariable};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// Reading - 单条读数
// ==========================================
// 标识: 在读数表中的位置（无显式主键）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Reading {
    pub current_a: Option<f64>,             // 电机电流 (A)
    pub torque_nm: Option<f64>,             // 扭矩 (N·m)
    pub hydraulic_pressure_bar: Option<f64>, // 液压 (bar)
    pub oil_temperature_c: Option<f64>,     // 油温 (°C)
    pub timestamp: Option<NaiveDateTime>,   // 采样时间（可选）
}

impl Reading {
    /// 四项读数齐全的构造函数
    pub fn new(current_a: f64, torque_nm: f64, hydraulic_pressure_bar: f64, oil_temperature_c: f64) -> Self {
        Self {
            current_a: Some(current_a),
            torque_nm: Some(torque_nm),
            hydraulic_pressure_bar: Some(hydraulic_pressure_bar),
            oil_temperature_c: Some(oil_temperature_c),
            timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// 读取指定变量
    pub fn value(&self, variable: SensorVariable) -> Option<f64> {
        match variable {
            SensorVariable::Current => self.current_a,
            SensorVariable::Torque => self.torque_nm,
            SensorVariable::HydraulicPressure => self.hydraulic_pressure_bar,
            SensorVariable::OilTemperature => self.oil_temperature_c,
        }
    }

    /// 写入指定变量
    pub fn set_value(&mut self, variable: SensorVariable, value: Option<f64>) {
        match variable {
            SensorVariable::Current => self.current_a = value,
            SensorVariable::Torque => self.torque_nm = value,
            SensorVariable::HydraulicPressure => self.hydraulic_pressure_bar = value,
            SensorVariable::OilTemperature => self.oil_temperature_c = value,
        }
    }

    /// 是否至少有一个有效数值
    pub fn has_any_value(&self) -> bool {
        SensorVariable::ALL.iter().any(|v| self.value(*v).is_some())
    }

    /// 是否为全零 / 全缺失提交（人工录入需拒绝）
    pub fn is_blank(&self) -> bool {
        SensorVariable::ALL
            .iter()
            .all(|v| self.value(*v).map_or(true, |x| x == 0.0))
    }
}

// ==========================================
// ScoredReading - 评分后读数
// ==========================================
// 派生数据: 每次评分重新计算，不单独持久化
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredReading {
    pub reading: Reading,
    pub risk: RiskLabel,
    pub cause: ProbableCause,
    pub anomaly_score: f64, // 异常分 (0,1]，越高越异常
}

impl ScoredReading {
    pub fn is_risk(&self) -> bool {
        self.risk.is_risk()
    }
}
