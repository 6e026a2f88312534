use bon::Builder;
use tokio_util::sync::CancellationToken;

/// 应用层上下文（Application Context）
///
/// 承载一次应用层调用（命令/查询/通知）所需的横切信息：
/// - 关联追踪 `correlation_id` 与执行者 `actor`；
/// - 幂等键（`idempotency_key`）：用于在基础设施层实现请求幂等；
/// - 取消令牌：令牌被取消后，经由中介者的调用返回 `AppError::Cancelled`。
///
/// 典型用法：
/// ```rust
/// use domaid_application::context::AppContext;
///
/// let ctx = AppContext::builder()
///     .correlation_id("cor-123".to_string())
///     .actor("u-1".to_string())
///     .idempotency_key("idem-xyz".to_string())
///     .build();
/// assert!(!ctx.is_cancelled());
/// ```
#[derive(Builder, Clone, Debug, Default)]
pub struct AppContext {
    /// 链路追踪 ID（可选）
    pub correlation_id: Option<String>,
    /// 执行者标识（可选）
    pub actor: Option<String>,
    /// 幂等键（可选）：为空则由上层或基础设施决定是否参与幂等
    pub idempotency_key: Option<String>,
    #[builder(default)]
    cancellation: CancellationToken,
}

impl AppContext {
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// 派生子上下文：父令牌取消会传递给子令牌，反之不然
    pub fn child(&self) -> Self {
        Self {
            cancellation: self.cancellation.child_token(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_to_live_token() {
        let ctx = AppContext::builder()
            .maybe_correlation_id(None)
            .actor("svc".into())
            .build();
        assert!(ctx.correlation_id.is_none());
        assert_eq!(ctx.actor.as_deref(), Some("svc"));
        assert!(!ctx.is_cancelled());
    }

    #[test]
    fn cancellation_flows_to_children_only() {
        let parent = AppContext::default();
        let child = parent.child();

        child.cancellation().cancel();
        assert!(child.is_cancelled());
        assert!(!parent.is_cancelled());

        let other = parent.child();
        parent.cancellation().cancel();
        assert!(other.is_cancelled());
    }

    #[test]
    fn clones_share_the_token() {
        let ctx = AppContext::builder()
            .cancellation(CancellationToken::new())
            .build();
        let clone = ctx.clone();
        ctx.cancellation().cancel();
        assert!(clone.is_cancelled());
    }
}
