// ==========================================
// 电机运行监测系统 - 读数模拟器
// ==========================================
// 职责: 生成围绕额定工况的模拟读数，可按概率注入故障
// 红线: 固定种子 → 相同序列
// ==========================================

use crate::domain::reading::Reading;
use crate::importer::error::{ImportError, ImportResult};
use chrono::{Duration, NaiveDateTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

/// 默认噪声标准差
pub const DEFAULT_NOISE_SIGMA: f64 = 1.0;

// 额定工况
const NOMINAL_CURRENT_A: f64 = 12.0;
const NOMINAL_TORQUE_NM: f64 = 150.0;
const NOMINAL_PRESSURE_BAR: f64 = 85.0;
const NOMINAL_OIL_TEMP_C: f64 = 60.0;

/// 可注入的故障类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaultKind {
    Overload,    // 电流过载
    Leak,        // 液压泄漏
    Overheating, // 油温过高
    Friction,    // 摩擦增大
}

impl FaultKind {
    const ALL: [FaultKind; 4] = [
        FaultKind::Overload,
        FaultKind::Leak,
        FaultKind::Overheating,
        FaultKind::Friction,
    ];

    fn apply(&self, reading: &mut Reading) {
        match self {
            FaultKind::Overload => reading.current_a = reading.current_a.map(|v| v + 7.0),
            FaultKind::Leak => {
                reading.hydraulic_pressure_bar = reading.hydraulic_pressure_bar.map(|v| (v - 15.0).max(0.0))
            }
            FaultKind::Overheating => {
                reading.oil_temperature_c = reading.oil_temperature_c.map(|v| v + 15.0)
            }
            FaultKind::Friction => reading.torque_nm = reading.torque_nm.map(|v| v + 20.0),
        }
    }
}

// ==========================================
// ReadingSimulator
// ==========================================
pub struct ReadingSimulator {
    rng: StdRng,
    step: u64,
    noise_sigma: f64,           // 高斯噪声标准差，构造时校验
    pub fault_probability: f64, // 每条读数注入故障的概率 [0,1]
    pub start: Option<NaiveDateTime>,
    pub interval: Duration,
}

impl ReadingSimulator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            step: 0,
            noise_sigma: DEFAULT_NOISE_SIGMA,
            fault_probability: 0.0,
            start: None,
            interval: Duration::minutes(1),
        }
    }

    /// 设置噪声标准差（须为非负有限数）
    pub fn with_noise_sigma(mut self, sigma: f64) -> ImportResult<Self> {
        if !sigma.is_finite() || sigma < 0.0 {
            return Err(ImportError::InvalidSimulatorParameter(format!(
                "noise_sigma={}，须为非负有限数",
                sigma
            )));
        }
        self.noise_sigma = sigma;
        Ok(self)
    }

    pub fn noise_sigma(&self) -> f64 {
        self.noise_sigma
    }

    pub fn with_fault_probability(mut self, probability: f64) -> Self {
        self.fault_probability = probability.clamp(0.0, 1.0);
        self
    }

    /// 为生成的读数附加时间戳: start + step × interval
    pub fn with_start(mut self, start: NaiveDateTime, interval: Duration) -> Self {
        self.start = Some(start);
        self.interval = interval;
        self
    }

    /// 生成下一条读数
    pub fn next_reading(&mut self) -> Reading {
        let t = self.step as f64;

        let mut reading = Reading {
            current_a: Some(self.noisy(NOMINAL_CURRENT_A, 0.5)),
            torque_nm: Some(self.noisy(NOMINAL_TORQUE_NM + 5.0 * (t / 5.0).sin(), 1.0)),
            hydraulic_pressure_bar: Some(self.noisy(NOMINAL_PRESSURE_BAR, 1.0)),
            oil_temperature_c: Some(self.noisy(NOMINAL_OIL_TEMP_C + 8.0 * (t / 8.0).sin(), 1.0)),
            timestamp: self
                .start
                .map(|start| start + self.interval * self.step as i32),
        };

        if self.fault_probability > 0.0 && self.rng.gen_bool(self.fault_probability.min(1.0)) {
            let fault = FaultKind::ALL[self.rng.gen_range(0..FaultKind::ALL.len())];
            fault.apply(&mut reading);
        }

        self.step += 1;
        reading
    }

    /// 连续生成 n 条读数
    pub fn generate(&mut self, n: usize) -> Vec<Reading> {
        (0..n).map(|_| self.next_reading()).collect()
    }

    /// 带噪声取值 base + N(0, σ·scale)（结果不小于 0）
    fn noisy(&mut self, base: f64, scale: f64) -> f64 {
        (base + self.noise() * scale).max(0.0)
    }

    /// N(0, σ) 采样
    fn noise(&mut self) -> f64 {
        let z: f64 = self.rng.sample(StandardNormal);
        z * self.noise_sigma
    }
}

// ==========================================
// 历史趋势序列
// ==========================================

/// 历史趋势点（扭矩 / 油温随时间变化）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub minute: u32,
    pub torque_nm: f64,
    pub oil_temperature_c: f64,
}

/// 生成扭矩与油温的历史趋势序列
///
/// torque = 150 + 5·sin(t/5) + N(0,1), temp = 60 + 8·sin(t/8) + N(0,1)
pub fn history_series(points: u32, seed: u64) -> Vec<HistoryPoint> {
    let mut sim = ReadingSimulator::new(seed);
    (0..points)
        .map(|minute| {
            let t = minute as f64;
            let torque_nm = NOMINAL_TORQUE_NM + 5.0 * (t / 5.0).sin() + sim.noise();
            let oil_temperature_c = NOMINAL_OIL_TEMP_C + 8.0 * (t / 8.0).sin() + sim.noise();
            HistoryPoint {
                minute,
                torque_nm,
                oil_temperature_c,
            }
        })
        .collect()
}
