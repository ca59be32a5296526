// ==========================================
// 电机运行监测系统 - 内置样本数据
// ==========================================
// 用途: 读数表缺失或不可读时的固定回退数据（10 行，确定性）
// ==========================================

use crate::domain::reading::Reading;

/// 内置样本: (电流 A, 扭矩 N·m, 液压 bar, 油温 °C)
const BUILTIN_ROWS: [(f64, f64, f64, f64); 10] = [
    (12.1, 148.2, 85.4, 58.3),
    (18.5, 160.4, 90.2, 68.4),
    (11.7, 145.9, 84.8, 57.6),
    (10.8, 138.5, 82.1, 42.0),
    (12.6, 151.3, 86.0, 60.1),
    (13.0, 149.7, 78.5, 61.8),
    (11.9, 147.1, 85.9, 59.0),
    (12.3, 152.6, 84.3, 64.7),
    (12.8, 155.8, 87.1, 60.9),
    (11.5, 146.4, 83.6, 58.8),
];

/// 内置样本读数
pub fn builtin_sample() -> Vec<Reading> {
    BUILTIN_ROWS
        .iter()
        .map(|&(current, torque, pressure, temp)| Reading::new(current, torque, pressure, temp))
        .collect()
}
