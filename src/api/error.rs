// ==========================================
// 电机运行监测系统 - API层错误类型
// ==========================================
// 职责: 汇总导入/仓储/引擎/配置错误，转换为面向调用方的错误
// 说明: 可降级错误（读数表/报警日志不可用）不经此处，
//       它们作为告警随 PassReport 返回
// ==========================================

use crate::engine::error::EngineError;
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 评分错误（对本次流程致命）
    // ==========================================
    #[error("无可用特征，本次评分中止: 批次 {rows} 行")]
    NoValidFeatures { rows: usize },

    #[error("参数无效: {0}")]
    InvalidParameter(String),

    // ==========================================
    // 输入错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("文件导入失败: {0}")]
    ImportError(String),

    // ==========================================
    // 存储错误
    // ==========================================
    #[error("存储写入失败: {0}")]
    StorageError(String),

    #[error("配置错误: {0}")]
    ConfigError(String),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::FileWriteError(msg) | RepositoryError::CsvWriteError(msg) => {
                ApiError::StorageError(msg)
            }
            // 锁错误与（仅作告警出现的）可降级错误保留完整描述
            other => ApiError::StorageError(other.to_string()),
        }
    }
}

// ==========================================
// 从 EngineError 转换
// ==========================================
impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        let message = err.to_string();
        match err {
            EngineError::NoValidFeatures { rows } => ApiError::NoValidFeatures { rows },
            EngineError::InvalidParameter { .. } => ApiError::InvalidParameter(message),
        }
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        let message = err.to_string();
        match err {
            ImportError::EmptySubmission => ApiError::InvalidInput(message),
            ImportError::InvalidSimulatorParameter(_) => ApiError::InvalidParameter(message),
            _ => ApiError::ImportError(message),
        }
    }
}

impl From<Box<dyn std::error::Error>> for ApiError {
    fn from(err: Box<dyn std::error::Error>) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_errors_keep_kind() {
        let err: ApiError = EngineError::NoValidFeatures { rows: 3 }.into();
        assert!(matches!(err, ApiError::NoValidFeatures { rows: 3 }));

        let err: ApiError = EngineError::InvalidParameter {
            name: "contamination",
            value: "1.5".to_string(),
            reason: "必须位于开区间 (0, 1)",
        }
        .into();
        assert!(err.to_string().contains("contamination=1.5"));
    }

    #[test]
    fn test_empty_submission_is_invalid_input() {
        let err: ApiError = ImportError::EmptySubmission.into();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    #[test]
    fn test_repository_errors_map_to_storage() {
        let err: ApiError = RepositoryError::CsvWriteError("disk full".to_string()).into();
        assert!(matches!(err, ApiError::StorageError(ref m) if m == "disk full"));

        let err: ApiError = RepositoryError::LockError("alarm_log.csv.lock".to_string()).into();
        assert!(matches!(err, ApiError::StorageError(ref m) if m.contains("alarm_log.csv.lock")));
    }

    #[test]
    fn test_invalid_simulator_parameter_is_invalid_parameter() {
        let err: ApiError = ImportError::InvalidSimulatorParameter("noise_sigma=-1".to_string()).into();
        assert!(matches!(err, ApiError::InvalidParameter(_)));
    }
}
