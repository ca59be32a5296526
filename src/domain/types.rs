// ==========================================
// 电机运行监测系统 - 领域类型定义
// ==========================================
// 职责: 风险标签 / 报警等级 / 报警状态 / 传感器变量 / 可能原因
// 红线: 风险标签只有两个取值; 原因描述来自固定规则集
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 风险标签 (Risk Label)
// ==========================================
// 红线: 只有 Normal / Risk 两个取值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLabel {
    Normal, // 正常
    Risk,   // 风险
}

impl RiskLabel {
    pub fn is_risk(&self) -> bool {
        matches!(self, RiskLabel::Risk)
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLabel::Normal => write!(f, "Normal"),
            RiskLabel::Risk => write!(f, "Risk"),
        }
    }
}

// ==========================================
// 报警等级 (Alarm Level)
// ==========================================
// 顺序: Low < Medium < High
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AlarmLevel {
    Low,    // 低
    Medium, // 中
    High,   // 高
}

impl fmt::Display for AlarmLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlarmLevel::Low => write!(f, "Low"),
            AlarmLevel::Medium => write!(f, "Medium"),
            AlarmLevel::High => write!(f, "High"),
        }
    }
}

impl AlarmLevel {
    /// 从日志文本解析等级（兼容旧版西语日志: Alta/Media/Baja）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "high" | "alta" => Some(AlarmLevel::High),
            "medium" | "media" => Some(AlarmLevel::Medium),
            "low" | "baja" => Some(AlarmLevel::Low),
            _ => None,
        }
    }
}

// ==========================================
// 报警状态 (Alarm Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlarmStatus {
    Pending,      // 待处理
    Acknowledged, // 已确认
    Resolved,     // 已处理
}

impl fmt::Display for AlarmStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlarmStatus::Pending => write!(f, "Pending"),
            AlarmStatus::Acknowledged => write!(f, "Acknowledged"),
            AlarmStatus::Resolved => write!(f, "Resolved"),
        }
    }
}

impl AlarmStatus {
    /// 从日志文本解析状态（兼容旧版西语日志: Pendiente）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" | "pendiente" => Some(AlarmStatus::Pending),
            "acknowledged" | "reconocida" => Some(AlarmStatus::Acknowledged),
            "resolved" | "resuelta" => Some(AlarmStatus::Resolved),
            _ => None,
        }
    }
}

// ==========================================
// 传感器变量 (Sensor Variable)
// ==========================================
// 列名即对外表头（读数表 / 报警日志 variable 列）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorVariable {
    Current,           // 电机电流 (A)
    Torque,            // 扭矩 (N·m)
    HydraulicPressure, // 液压 (bar)
    OilTemperature,    // 油温 (°C)
}

impl SensorVariable {
    /// 固定列顺序（特征矩阵列顺序与此一致）
    pub const ALL: [SensorVariable; 4] = [
        SensorVariable::Current,
        SensorVariable::Torque,
        SensorVariable::HydraulicPressure,
        SensorVariable::OilTemperature,
    ];

    /// 标准表头
    pub fn column_name(&self) -> &'static str {
        match self {
            SensorVariable::Current => "current (A)",
            SensorVariable::Torque => "torque (N·m)",
            SensorVariable::HydraulicPressure => "hydraulic_pressure (bar)",
            SensorVariable::OilTemperature => "oil_temperature (°C)",
        }
    }

    /// 从表头识别变量
    ///
    /// 忽略大小写、重音和单位后缀，兼容旧版西语表头
    /// （Corriente_motor (A) / Torque (Nm) / Presión_hidráulica (bar) / Temperatura_aceite (°C)）
    pub fn from_header(header: &str) -> Option<Self> {
        match normalize_header(header).as_str() {
            "current" | "motor_current" | "corriente" | "corriente_motor" => {
                Some(SensorVariable::Current)
            }
            "torque" | "par" => Some(SensorVariable::Torque),
            "hydraulic_pressure" | "pressure" | "presion" | "presion_hidraulica" => {
                Some(SensorVariable::HydraulicPressure)
            }
            "oil_temperature" | "temperature" | "temperatura" | "temperatura_aceite" => {
                Some(SensorVariable::OilTemperature)
            }
            _ => None,
        }
    }
}

impl fmt::Display for SensorVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

/// 表头标准化: 去单位后缀、小写、去重音、空白/连字符转下划线
pub fn normalize_header(header: &str) -> String {
    let base = header.split('(').next().unwrap_or("").trim();
    base.trim_start_matches('\u{feff}')
        .chars()
        .map(|c| match c {
            'á' | 'Á' => 'a',
            'é' | 'É' => 'e',
            'í' | 'Í' => 'i',
            'ó' | 'Ó' => 'o',
            'ú' | 'Ú' | 'ü' | 'Ü' => 'u',
            'ñ' | 'Ñ' => 'n',
            ' ' | '-' => '_',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

// ==========================================
// 可能原因 (Probable Cause)
// ==========================================
// 红线: 描述文本来自固定规则集，且非空
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProbableCause {
    ElectricalOverload, // 电流过载
    LowPressureLeak,    // 液压过低（泄漏）
    Overheating,        // 油温过高
    ElevatedTorque,     // 扭矩偏高（摩擦）
    Unclassified,       // 未分类异常
    NoAnomaly,          // 无异常
}

impl ProbableCause {
    /// 对外描述文本（报警日志 description 列）
    pub fn label(&self) -> &'static str {
        match self {
            ProbableCause::ElectricalOverload => "possible electrical overload",
            ProbableCause::LowPressureLeak => "low pressure — possible leak",
            ProbableCause::Overheating => "high temperature — overheating risk",
            ProbableCause::ElevatedTorque => "elevated torque — possible friction",
            ProbableCause::Unclassified => "unclassified anomaly",
            ProbableCause::NoAnomaly => "no anomalies detected",
        }
    }

    /// 规则对应的越界变量（未分类 / 无异常时为 None）
    pub fn variable(&self) -> Option<SensorVariable> {
        match self {
            ProbableCause::ElectricalOverload => Some(SensorVariable::Current),
            ProbableCause::LowPressureLeak => Some(SensorVariable::HydraulicPressure),
            ProbableCause::Overheating => Some(SensorVariable::OilTemperature),
            ProbableCause::ElevatedTorque => Some(SensorVariable::Torque),
            ProbableCause::Unclassified | ProbableCause::NoAnomaly => None,
        }
    }
}

impl fmt::Display for ProbableCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
