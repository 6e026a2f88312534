use crate::{
    command::Command, context::AppContext, error::AppResult, notification::Notification,
    outcome::Outcome, query::Query,
};
use async_trait::async_trait;

/// 中介者（Mediator）
///
/// 将命令、查询与通知的发送方与处理方解耦：
/// - `send`：命令路由到唯一处理器，返回其 [`Outcome`]；
/// - `query`：查询路由到唯一处理器，返回 DTO；
/// - `publish`：通知广播给全部订阅者，无订阅者时什么也不做。
///
/// 上下文已取消时，任何调用都返回 `AppError::Cancelled`。
/// 该 trait 带有泛型方法，通常以具体实现类型注入使用。
#[async_trait]
pub trait Mediator: Send + Sync {
    async fn send<C>(&self, ctx: &AppContext, cmd: C) -> AppResult<Outcome>
    where
        C: Command;

    async fn query<Q>(&self, ctx: &AppContext, q: Q) -> AppResult<Q::Dto>
    where
        Q: Query;

    async fn publish<N>(&self, ctx: &AppContext, notification: N) -> AppResult<()>
    where
        N: Notification;
}
