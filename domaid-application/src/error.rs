use domaid_domain::error::DomainError;

/// 应用层错误
///
/// 基础设施故障与路由问题以 `Err(AppError)` 传递；
/// 可预期的业务失败（如提交未生效）以 [`Outcome`](crate::outcome::Outcome) 表达。
#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("domain: {0}")]
    Domain(#[from] DomainError),

    #[error("validation: {0}")]
    Validation(String),

    #[error("handler not found: {0}")]
    HandlerNotFound(&'static str),

    #[error("handler already registered: command={command}")]
    AlreadyRegisteredCommand { command: &'static str },

    #[error("handler already registered: query={query}")]
    AlreadyRegisteredQuery { query: &'static str },

    #[error("type mismatch: expected={expected}, found={found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("cancelled: {operation}")]
    Cancelled { operation: &'static str },

    #[error("outcome failed: {0}")]
    Failed(String),
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_convert_with_question_mark() {
        fn inner() -> AppResult<()> {
            Err(DomainError::unit_of_work("lost connection"))?;
            Ok(())
        }

        let err = inner().unwrap_err();
        assert!(matches!(err, AppError::Domain(DomainError::UnitOfWork { .. })));
        assert!(err.to_string().contains("lost connection"));
    }

    #[test]
    fn cancelled_names_the_operation() {
        let err = AppError::Cancelled { operation: "send" };
        assert_eq!(err.to_string(), "cancelled: send");
    }
}
