use crate::{context::AppContext, error::AppResult, mediator::Mediator};
use domaid_domain::domain_event::{DomainEvent, Event};
use domaid_domain::entity::Entity;

/// 分发实体的待分发领域事件
///
/// 仅应在提交成功后调用。事件按记录顺序逐条以通知发布：
/// - 每次只发布队首事件的副本，发布成功后才将其从实体移除，
///   已发布的事件标记为已发布并按顺序返回；
/// - 某条发布失败时，该事件及其后的全部事件仍留在实体上（未发布），返回该错误；
/// - 调用方中途放弃（超时、`select!`、请求中止）时，未确认投递的事件同样保留。
///
/// 重试不会重复发布已投递的事件。
#[tracing::instrument(level = "debug", skip_all, fields(entity = %entity.code()), err)]
pub async fn dispatch_domain_events<M, T>(
    mediator: &M,
    ctx: &AppContext,
    entity: &mut T,
) -> AppResult<Vec<T::Event>>
where
    M: Mediator,
    T: Entity,
    T::Event: 'static,
{
    let mut delivered = Vec::with_capacity(entity.domain_events().len());

    while let Some(mut event) = entity.domain_events().first().cloned() {
        if let Err(err) = mediator.publish(ctx, event.clone()).await {
            tracing::warn!(
                event_id = %event.event_id(),
                event_type = event.event_type(),
                pending = entity.domain_events().len(),
                error = %err,
                "domain event publish failed, kept on entity"
            );
            return Err(err);
        }

        entity.remove_domain_event(&event);
        event.set_published(true);
        delivered.push(event);
    }

    tracing::debug!(count = delivered.len(), "domain events dispatched");
    Ok(delivered)
}
