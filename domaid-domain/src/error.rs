//! 领域层统一错误定义
//!
//! 仅覆盖仓储、工作单元与序列化等基础设施边界的故障，
//! 预期内的业务失败（例如提交返回 `false`）不走错误通道。
//!
use thiserror::Error;

/// 统一错误类型（基础库最小必要集）
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DomainError {
    // --- 序列化 ---
    #[error("serialization error: {source}")]
    Serde {
        #[from]
        source: serde_json::Error,
    },
    #[error("parse error: {reason}")]
    Parse { reason: String },

    // --- 仓储/持久化 ---
    #[error("repository error: {reason}")]
    Repository { reason: String },
    #[error("unit of work error: {reason}")]
    UnitOfWork { reason: String },
    #[error("database error: {reason}")]
    Database { reason: String },
    #[error("not found: {reason}")]
    NotFound { reason: String },
}

/// 统一 Result 类型别名
pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    pub fn repository(reason: impl Into<String>) -> Self {
        DomainError::Repository {
            reason: reason.into(),
        }
    }

    pub fn unit_of_work(reason: impl Into<String>) -> Self {
        DomainError::UnitOfWork {
            reason: reason.into(),
        }
    }

    pub fn database(reason: impl Into<String>) -> Self {
        DomainError::Database {
            reason: reason.into(),
        }
    }

    pub fn not_found(reason: impl Into<String>) -> Self {
        DomainError::NotFound {
            reason: reason.into(),
        }
    }
}

// 允许在基础设施层直接使用 `?` 将 uuid/chrono 解析错误转换为 DomainError

impl From<uuid::Error> for DomainError {
    fn from(err: uuid::Error) -> Self {
        DomainError::Parse {
            reason: err.to_string(),
        }
    }
}

impl From<chrono::ParseError> for DomainError {
    fn from(err: chrono::ParseError) -> Self {
        DomainError::Parse {
            reason: err.to_string(),
        }
    }
}
