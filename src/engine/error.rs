// ==========================================
// 电机运行监测系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: NoValidFeatures 必须在产生任何标签之前返回
// ==========================================

use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("无可用特征: 批次 {rows} 行中没有任何一列数值完整")]
    NoValidFeatures { rows: usize },

    #[error("参数无效 ({name}={value}): {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
