use crate::{context::AppContext, error::AppResult};
use async_trait::async_trait;
use domaid_domain::domain_event::Event;

/// 通知：可广播给任意数量订阅者的事件
///
/// 所有满足 [`Event`] 的类型（含领域事件）均可直接作为通知发布。
pub trait Notification: Event + 'static {}

impl<T> Notification for T where T: Event + 'static {}

/// 通知处理器
///
/// 同一通知的多个处理器可能并发执行，处理器之间不应假设先后顺序。
#[async_trait]
pub trait NotificationHandler<N>: Send + Sync
where
    N: Notification,
{
    async fn handle(&self, ctx: &AppContext, notification: &N) -> AppResult<()>;
}
