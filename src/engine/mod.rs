// ==========================================
// 电机运行监测系统 - 引擎层
// ==========================================
// 职责: 异常检测 + 原因分类，纯计算，不做文件 I/O
// 红线: 每次检测在当前批次上重新训练，不持久化模型
// ==========================================

pub mod classifier;
pub mod detector;
pub mod error;
pub mod isolation_forest;
pub mod orchestrator;

// 重导出核心引擎
pub use classifier::{CauseClassifier, CauseThresholds};
pub use detector::{AnomalyDetector, DetectionResult, DetectorConfig};
pub use error::{EngineError, EngineResult};
pub use isolation_forest::{ForestParams, IsolationForest};
pub use orchestrator::MonitorOrchestrator;
