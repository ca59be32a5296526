// ==========================================
// 电机运行监测系统 - 监测 API
// ==========================================
// 职责: 封装 加载 → 检测 → 分类 → 记录 流程，以及人工录入/模拟数据
// 说明: 仓储经 Arc 共享，定时刷新与人工操作可并发调用
// 红线: 评分失败时不写入任何报警
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::MonitorConfig;
use crate::domain::alarm::AlarmRecord;
use crate::domain::reading::{Reading, ScoredReading};
use crate::domain::types::{AlarmLevel, AlarmStatus, ProbableCause, RiskLabel};
use crate::engine::MonitorOrchestrator;
use crate::importer::{ImportError, ReadingSimulator};
use crate::repository::{AlarmLogRepository, Loaded, ReadingRepository, RepositoryError};
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// 模拟数据默认故障注入概率
pub const DEFAULT_FAULT_PROBABILITY: f64 = 0.1;

/// 单次监测流程结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassReport {
    /// 评分时间（同时作为报警时间戳）
    pub scored_at: NaiveDateTime,
    pub total: usize,
    pub risk: usize,
    pub normal: usize,
    /// 本次新增报警数
    pub alarms_appended: usize,
    pub readings: Vec<ScoredReading>,
    /// 流程中出现的可降级告警
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// 报警历史汇总
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlarmSummary {
    pub total: usize,
    pub pending: usize,
    pub by_level: BTreeMap<AlarmLevel, usize>,
    pub records: Vec<AlarmRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// 监测API
pub struct MonitorApi {
    readings: Arc<ReadingRepository>,
    alarms: Arc<AlarmLogRepository>,
    orchestrator: MonitorOrchestrator,
    config: MonitorConfig,
}

impl MonitorApi {
    /// 创建新的MonitorApi实例（检测参数与阈值在此校验）
    pub fn new(
        readings: Arc<ReadingRepository>,
        alarms: Arc<AlarmLogRepository>,
        config: MonitorConfig,
    ) -> ApiResult<Self> {
        let orchestrator = MonitorOrchestrator::new(config.detector, config.thresholds)?;
        Ok(Self {
            readings,
            alarms,
            orchestrator,
            config,
        })
    }

    /// 按配置中的路径创建仓储
    pub fn from_config(config: MonitorConfig) -> ApiResult<Self> {
        let readings = Arc::new(ReadingRepository::new(config.readings_path.clone()));
        let alarms = Arc::new(AlarmLogRepository::new(config.alarm_log_path.clone()));
        Self::new(readings, alarms, config)
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn reading_repository(&self) -> Arc<ReadingRepository> {
        Arc::clone(&self.readings)
    }

    pub fn alarm_repository(&self) -> Arc<AlarmLogRepository> {
        Arc::clone(&self.alarms)
    }

    // ==========================================
    // 读数
    // ==========================================

    /// 加载读数表（缺失/损坏时为内置样本 + 告警）
    pub fn load(&self) -> Loaded<Vec<Reading>> {
        self.readings.load()
    }

    /// 追加一条读数
    pub fn append_reading(&self, reading: Reading) -> ApiResult<Loaded<usize>> {
        Ok(self.readings.append(reading)?)
    }

    /// 人工录入：全零或全缺失的读数被拒绝
    pub fn submit_manual(&self, reading: Reading) -> ApiResult<Loaded<usize>> {
        if reading.is_blank() {
            warn!("人工录入被拒绝: 读数全部为零或缺失");
            return Err(ImportError::EmptySubmission.into());
        }
        let result = self.append_reading(reading)?;
        info!(total = result.data, "人工录入已保存");
        Ok(result)
    }

    /// 生成 n 条模拟读数并追加
    pub fn simulate(&self, n: usize, seed: u64, start: NaiveDateTime) -> ApiResult<Loaded<usize>> {
        let generated = ReadingSimulator::new(seed)
            .with_fault_probability(DEFAULT_FAULT_PROBABILITY)
            .with_start(start, Duration::minutes(1))
            .generate(n);
        let result = self.readings.append_many(&generated)?;
        info!(generated = n, total = result.data, "模拟读数已追加");
        Ok(result)
    }

    // ==========================================
    // 检测与分类
    // ==========================================

    pub fn score(&self, readings: &[Reading]) -> ApiResult<Vec<RiskLabel>> {
        Ok(self.orchestrator.detector().score(readings)?)
    }

    pub fn classify(&self, reading: &Reading, risk: RiskLabel) -> ProbableCause {
        self.orchestrator.classifier().classify(reading, risk)
    }

    pub fn score_and_classify(&self, readings: &[Reading]) -> ApiResult<Vec<ScoredReading>> {
        Ok(self.orchestrator.score_and_classify(readings)?)
    }

    // ==========================================
    // 报警
    // ==========================================

    /// 为每条 Risk 读数追加一条报警
    pub fn record(&self, scored: &[ScoredReading], now: NaiveDateTime) -> ApiResult<Loaded<usize>> {
        Ok(self.alarms.record(scored, now)?)
    }

    pub fn read_alarms(&self) -> Loaded<Vec<AlarmRecord>> {
        self.alarms.read_all()
    }

    /// 报警历史 + 等级分布 + 待处理数
    pub fn alarm_summary(&self) -> AlarmSummary {
        let history = self.read_alarms();
        let by_level = crate::domain::alarm::level_distribution(&history.data);
        let pending = history.data.iter().filter(|a| a.status == AlarmStatus::Pending).count();
        AlarmSummary {
            total: history.data.len(),
            pending,
            by_level,
            warnings: history.warnings.iter().map(|w| w.to_string()).collect(),
            records: history.data,
        }
    }

    // ==========================================
    // 完整流程
    // ==========================================

    /// 加载 → 检测 → 分类 → 记录
    ///
    /// NoValidFeatures 在记录前中止，报警日志保持不变
    #[instrument(skip(self), fields(table = %self.config.readings_path.display()))]
    pub fn run_pass(&self, now: NaiveDateTime) -> ApiResult<PassReport> {
        let loaded = self.load();
        let mut warnings: Vec<RepositoryError> = loaded.warnings;

        let scored = match self.score_and_classify(&loaded.data) {
            Ok(scored) => scored,
            Err(e @ ApiError::NoValidFeatures { .. }) => {
                warn!(error = %e, "评分中止，本次不记录报警");
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        let appended = self.record(&scored, now)?;
        warnings.extend(appended.warnings);

        let risk = scored.iter().filter(|s| s.is_risk()).count();
        let report = PassReport {
            scored_at: now,
            total: scored.len(),
            risk,
            normal: scored.len() - risk,
            alarms_appended: appended.data,
            readings: scored,
            warnings: warnings.iter().map(|w| w.to_string()).collect(),
        };

        info!(
            total = report.total,
            risk = report.risk,
            alarms = report.alarms_appended,
            warnings = report.warnings.len(),
            "监测流程完成"
        );
        Ok(report)
    }
}
