// ==========================================
// 电机运行监测系统 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: SourceUnavailable / LogUnavailable 为可降级错误，
//       以告警形式随结果返回（见 Loaded），不中断流程
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RepositoryError {
    // ===== 可降级错误（告警） =====
    #[error("读数表不可用，已回退内置样本 (path={path}): {reason}")]
    SourceUnavailable { path: String, reason: String },

    #[error("报警日志不可用，按空日志处理 (path={path}): {reason}")]
    LogUnavailable { path: String, reason: String },

    // ===== 存储错误 =====
    #[error("追加锁获取失败: {0}")]
    LockError(String),

    #[error("文件写入失败: {0}")]
    FileWriteError(String),

    #[error("CSV 写入失败: {0}")]
    CsvWriteError(String),
}

impl RepositoryError {
    /// 是否为可降级错误（仅告警，不中断）
    pub fn is_degraded(&self) -> bool {
        matches!(
            self,
            RepositoryError::SourceUnavailable { .. } | RepositoryError::LogUnavailable { .. }
        )
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for RepositoryError {
    fn from(err: std::io::Error) -> Self {
        RepositoryError::FileWriteError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for RepositoryError {
    fn from(err: csv::Error) -> Self {
        RepositoryError::CsvWriteError(err.to_string())
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;

// ==========================================
// Loaded - 带告警的结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    pub data: T,
    pub warnings: Vec<RepositoryError>,
}

impl<T> Loaded<T> {
    pub fn clean(data: T) -> Self {
        Self {
            data,
            warnings: Vec::new(),
        }
    }

    pub fn degraded(data: T, warning: RepositoryError) -> Self {
        Self {
            data,
            warnings: vec![warning],
        }
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Loaded<U> {
        Loaded {
            data: f(self.data),
            warnings: self.warnings,
        }
    }
}
