// ==========================================
// 电机运行监测系统 - 核心库
// ==========================================
// 技术栈: Rust + CSV/Excel 表格 + SQLite 配置
// 系统定位: 电机运行异常检测与报警记录（人工最终处置）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 读数表与报警日志
pub mod repository;

// 引擎层 - 异常检测与原因分类
pub mod engine;

// 导入层 - 外部表格与模拟数据
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AlarmLevel, AlarmStatus, ProbableCause, RiskLabel, SensorVariable};

// 领域实体
pub use domain::{AlarmRecord, Reading, ScoredReading};

// 引擎
pub use engine::{AnomalyDetector, CauseClassifier, CauseThresholds, DetectorConfig, MonitorOrchestrator};

// 仓储
pub use repository::{AlarmLogRepository, ReadingRepository};

// API
pub use api::{MonitorApi, PassReport};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "电机运行监测系统";
