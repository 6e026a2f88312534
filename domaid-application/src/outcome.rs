use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 失败类别
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Validation,
    NotFound,
    Conflict,
    Unauthorized,
    Server,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::Validation => "validation",
            FailureKind::NotFound => "not_found",
            FailureKind::Conflict => "conflict",
            FailureKind::Unauthorized => "unauthorized",
            FailureKind::Server => "server",
        };
        f.write_str(s)
    }
}

/// 单条失败信息
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// 用例执行结果
///
/// 不含任何失败即为成功；失败按附加顺序保存。
/// 比较为结构相等：`Outcome::create()` 与 `Outcome::success()` 相等，
/// 两个携带同样失败序列的结果也相等。
///
/// ```rust
/// use domaid_application::outcome::{FailureKind, Outcome};
///
/// let outcome = Outcome::create().with_server_error("Failed to commit data");
/// assert!(outcome.is_failure());
/// assert_eq!(outcome.failures()[0].kind, FailureKind::Server);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    failures: Vec<Failure>,
}

impl Outcome {
    pub fn success() -> Self {
        Self::default()
    }

    /// 空结果，附加失败前视为成功
    pub fn create() -> Self {
        Self::default()
    }

    pub fn with_failure(mut self, kind: FailureKind, message: impl Into<String>) -> Self {
        self.failures.push(Failure {
            kind,
            message: message.into(),
        });
        self
    }

    pub fn with_server_error(self, message: impl Into<String>) -> Self {
        self.with_failure(FailureKind::Server, message)
    }

    pub fn with_validation_error(self, message: impl Into<String>) -> Self {
        self.with_failure(FailureKind::Validation, message)
    }

    pub fn with_not_found(self, message: impl Into<String>) -> Self {
        self.with_failure(FailureKind::NotFound, message)
    }

    /// 追加另一个结果的全部失败
    pub fn merge(mut self, other: Outcome) -> Self {
        self.failures.extend(other.failures);
        self
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    /// 转换为错误通道：校验失败映射为 `AppError::Validation`，其余为 `AppError::Failed`
    pub fn into_result(self) -> AppResult<()> {
        if self.is_success() {
            return Ok(());
        }
        let message = self
            .failures
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        if self
            .failures
            .iter()
            .all(|f| f.kind == FailureKind::Validation)
        {
            Err(AppError::Validation(message))
        } else {
            Err(AppError::Failed(message))
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_success() {
            return f.write_str("success");
        }
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{failure}")?;
        }
        Ok(())
    }
}
