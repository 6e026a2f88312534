use crate::{
    command::Command,
    command_handler::CommandHandler,
    context::AppContext,
    error::{AppError, AppResult},
    mediator::Mediator,
    notification::{Notification, NotificationHandler},
    outcome::Outcome,
    query::Query,
    query_handler::QueryHandler,
};
use async_trait::async_trait;
use bon::Builder;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures_util::{StreamExt, stream};
use std::any::{Any, TypeId, type_name};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::Instrument;

type HandlerFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

type CommandFn =
    Arc<dyn for<'a> Fn(Box<dyn Any + Send>, &'a AppContext) -> HandlerFuture<'a, Outcome> + Send + Sync>;

type QueryFn = Arc<
    dyn for<'a> Fn(Box<dyn Any + Send>, &'a AppContext) -> HandlerFuture<'a, Box<dyn Any + Send>>
        + Send
        + Sync,
>;

type NotificationFn = Arc<
    dyn for<'a> Fn(&'a (dyn Any + Send + Sync), &'a AppContext) -> HandlerFuture<'a, ()>
        + Send
        + Sync,
>;

// 以泛型约束固定闭包签名，使其对 'a 高阶
fn command_fn<F>(f: F) -> CommandFn
where
    F: for<'a> Fn(Box<dyn Any + Send>, &'a AppContext) -> HandlerFuture<'a, Outcome>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}

fn query_fn<F>(f: F) -> QueryFn
where
    F: for<'a> Fn(Box<dyn Any + Send>, &'a AppContext) -> HandlerFuture<'a, Box<dyn Any + Send>>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}

fn notification_fn<F>(f: F) -> NotificationFn
where
    F: for<'a> Fn(&'a (dyn Any + Send + Sync), &'a AppContext) -> HandlerFuture<'a, ()>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}

/// 中介者配置
#[derive(Clone, Copy, Debug)]
pub struct MediatorConfig {
    /// 单条通知的处理并发（同一通知广播给多个 handler）
    pub handler_concurrency: usize,
}

impl Default for MediatorConfig {
    fn default() -> Self {
        Self {
            handler_concurrency: 8,
        }
    }
}

/// 基于内存的中介者实现
/// - 通过 TypeId 注册命令/查询/通知对应的处理器
/// - 运行时以类型擦除（Any）方式进行调度
/// - 命令与查询各自只允许一个处理器，通知允许任意多个
///
/// ```rust
/// use domaid_application::in_memory_mediator::{InMemoryMediator, MediatorConfig};
///
/// let mediator = InMemoryMediator::builder()
///     .config(MediatorConfig { handler_concurrency: 2 })
///     .build();
/// assert_eq!(mediator.config().handler_concurrency, 2);
/// ```
#[derive(Builder)]
pub struct InMemoryMediator {
    #[builder(skip)]
    commands: DashMap<TypeId, CommandFn>,
    #[builder(skip)]
    queries: DashMap<TypeId, QueryFn>,
    #[builder(skip)]
    notifications: DashMap<TypeId, Vec<NotificationFn>>,
    #[builder(default)]
    config: MediatorConfig,
}

impl Default for InMemoryMediator {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl InMemoryMediator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> &MediatorConfig {
        &self.config
    }

    /// 注册命令处理器；同一命令类型重复注册返回 `AlreadyRegisteredCommand`
    pub fn register_command<C, H>(&self, handler: Arc<H>) -> AppResult<()>
    where
        C: Command,
        H: CommandHandler<C> + 'static,
    {
        let f = command_fn(move |boxed_cmd, ctx| {
            let handler = handler.clone();

            Box::pin(async move {
                // 键与闭包同一泛型 C，正常情况下 downcast 不会失败
                match boxed_cmd.downcast::<C>() {
                    Ok(cmd) => handler.handle(ctx, *cmd).await,
                    Err(_) => Err(AppError::TypeMismatch {
                        expected: C::NAME,
                        found: "unknown",
                    }),
                }
            })
        });

        match self.commands.entry(TypeId::of::<C>()) {
            Entry::Occupied(_) => Err(AppError::AlreadyRegisteredCommand { command: C::NAME }),
            Entry::Vacant(slot) => {
                slot.insert(f);
                Ok(())
            }
        }
    }

    /// 注册查询处理器；同一查询类型重复注册返回 `AlreadyRegisteredQuery`
    pub fn register_query<Q, H>(&self, handler: Arc<H>) -> AppResult<()>
    where
        Q: Query,
        H: QueryHandler<Q> + 'static,
    {
        let f = query_fn(move |boxed_q, ctx| {
            let handler = handler.clone();

            Box::pin(async move {
                match boxed_q.downcast::<Q>() {
                    Ok(q) => {
                        let dto = handler.handle(ctx, *q).await?;
                        Ok(Box::new(dto) as Box<dyn Any + Send>)
                    }
                    Err(_) => Err(AppError::TypeMismatch {
                        expected: Q::NAME,
                        found: "unknown",
                    }),
                }
            })
        });

        match self.queries.entry(TypeId::of::<Q>()) {
            Entry::Occupied(_) => Err(AppError::AlreadyRegisteredQuery { query: Q::NAME }),
            Entry::Vacant(slot) => {
                slot.insert(f);
                Ok(())
            }
        }
    }

    /// 订阅通知；同一通知类型可有多个处理器
    pub fn subscribe<N, H>(&self, handler: Arc<H>)
    where
        N: Notification,
        H: NotificationHandler<N> + 'static,
    {
        let f = notification_fn(move |payload, ctx| {
            let handler = handler.clone();

            Box::pin(async move {
                match payload.downcast_ref::<N>() {
                    Some(n) => handler.handle(ctx, n).await,
                    None => Err(AppError::TypeMismatch {
                        expected: type_name::<N>(),
                        found: "unknown",
                    }),
                }
            })
        });

        self.notifications
            .entry(TypeId::of::<N>())
            .or_default()
            .push(f);
    }

    /// 某通知类型当前的订阅者数量
    pub fn subscriber_count<N: Notification>(&self) -> usize {
        self.notifications
            .get(&TypeId::of::<N>())
            .map(|hs| hs.len())
            .unwrap_or(0)
    }
}

// 调用前检查取消；调用中令牌被取消则放弃等待
async fn guard<T, F>(ctx: &AppContext, operation: &'static str, fut: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    if ctx.is_cancelled() {
        return Err(AppError::Cancelled { operation });
    }

    tokio::select! {
        biased;
        _ = ctx.cancellation().cancelled() => Err(AppError::Cancelled { operation }),
        res = fut => res,
    }
}

#[async_trait]
impl Mediator for InMemoryMediator {
    async fn send<C>(&self, ctx: &AppContext, cmd: C) -> AppResult<Outcome>
    where
        C: Command,
    {
        let span = tracing::debug_span!("mediator.send", command = C::NAME);

        async move {
            // 先克隆出处理器，避免跨 await 持有 DashMap 的读锁
            let Some(f) = self.commands.get(&TypeId::of::<C>()).map(|h| h.clone()) else {
                return Err(AppError::HandlerNotFound(C::NAME));
            };

            let outcome = guard(ctx, C::NAME, (f)(Box::new(cmd), ctx)).await?;
            tracing::debug!(success = outcome.is_success(), "command handled");
            Ok(outcome)
        }
        .instrument(span)
        .await
    }

    async fn query<Q>(&self, ctx: &AppContext, q: Q) -> AppResult<Q::Dto>
    where
        Q: Query,
    {
        let span = tracing::debug_span!("mediator.query", query = Q::NAME);

        async move {
            let Some(f) = self.queries.get(&TypeId::of::<Q>()).map(|h| h.clone()) else {
                return Err(AppError::HandlerNotFound(Q::NAME));
            };

            let boxed = guard(ctx, Q::NAME, (f)(Box::new(q), ctx)).await?;
            boxed
                .downcast::<Q::Dto>()
                .map(|dto| *dto)
                .map_err(|_| AppError::TypeMismatch {
                    expected: type_name::<Q::Dto>(),
                    found: "unknown",
                })
        }
        .instrument(span)
        .await
    }

    async fn publish<N>(&self, ctx: &AppContext, notification: N) -> AppResult<()>
    where
        N: Notification,
    {
        let span = tracing::debug_span!(
            "mediator.publish",
            notification = notification.event_type()
        );

        async move {
            let handlers: Vec<NotificationFn> = self
                .notifications
                .get(&TypeId::of::<N>())
                .map(|hs| hs.clone())
                .unwrap_or_default();

            if handlers.is_empty() {
                tracing::debug!("no subscriber");
                return Ok(());
            }

            let first_error: Mutex<Option<AppError>> = Mutex::new(None);
            let slot = &first_error;
            let payload: &(dyn Any + Send + Sync) = &notification;
            let concurrency = self.config.handler_concurrency;

            let run_all = stream::iter(handlers).for_each_concurrent(Some(concurrency), move |h| async move {
                if let Err(err) = h(payload, ctx).await {
                    tracing::warn!(error = %err, "notification handler failed");
                    let mut first = slot.lock().await;
                    if first.is_none() {
                        *first = Some(err);
                    }
                }
            });
            guard(ctx, "publish", async {
                run_all.await;
                Ok(())
            })
            .await?;

            match first_error.into_inner() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::Dto;
    use serde::{Deserialize, Serialize};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct Ping(u32);
    impl Command for Ping {
        const NAME: &'static str = "ping";
    }

    struct PingHandler {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CommandHandler<Ping> for PingHandler {
        async fn handle(&self, _ctx: &AppContext, cmd: Ping) -> AppResult<Outcome> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if cmd.0 == 0 {
                return Ok(Outcome::create().with_validation_error("zero"));
            }
            Ok(Outcome::success())
        }
    }

    struct Slow;
    impl Command for Slow {
        const NAME: &'static str = "slow";
    }

    struct SlowHandler;

    #[async_trait]
    impl CommandHandler<Slow> for SlowHandler {
        async fn handle(&self, _ctx: &AppContext, _cmd: Slow) -> AppResult<Outcome> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(Outcome::success())
        }
    }

    #[derive(Debug, Serialize)]
    struct Echoed(String);
    impl Dto for Echoed {}

    struct Echo(String);
    impl Query for Echo {
        const NAME: &'static str = "echo";
        type Dto = Echoed;
    }

    struct EchoHandler;

    #[async_trait]
    impl QueryHandler<Echo> for EchoHandler {
        async fn handle(&self, _ctx: &AppContext, q: Echo) -> AppResult<Echoed> {
            Ok(Echoed(q.0))
        }
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Tick {
        at: chrono::DateTime<chrono::Utc>,
    }

    impl domaid_domain::domain_event::Event for Tick {
        fn event_type(&self) -> &str {
            "tick"
        }

        fn date_occurred(&self) -> chrono::DateTime<chrono::Utc> {
            self.at
        }
    }

    fn tick() -> Tick {
        Tick {
            at: chrono::Utc::now(),
        }
    }

    struct Counter {
        seen: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl NotificationHandler<Tick> for Counter {
        async fn handle(&self, _ctx: &AppContext, _n: &Tick) -> AppResult<()> {
            self.seen.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AppError::Validation("counter refused".into()));
            }
            Ok(())
        }
    }

    fn counter(fail: bool) -> Arc<Counter> {
        Arc::new(Counter {
            seen: AtomicUsize::new(0),
            fail,
        })
    }

    #[tokio::test]
    async fn send_routes_to_the_registered_handler() {
        let mediator = InMemoryMediator::new();
        let handler = Arc::new(PingHandler {
            calls: AtomicUsize::new(0),
        });
        mediator.register_command::<Ping, _>(handler.clone()).unwrap();

        let ctx = AppContext::default();
        assert!(mediator.send(&ctx, Ping(1)).await.unwrap().is_success());
        assert!(mediator.send(&ctx, Ping(0)).await.unwrap().is_failure());
        assert_eq!(handler.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected() {
        let mediator = InMemoryMediator::new();
        let make = || {
            Arc::new(PingHandler {
                calls: AtomicUsize::new(0),
            })
        };
        mediator.register_command::<Ping, _>(make()).unwrap();

        let err = mediator.register_command::<Ping, _>(make()).unwrap_err();
        assert!(matches!(err, AppError::AlreadyRegisteredCommand { command: "ping" }));

        mediator
            .register_query::<Echo, _>(Arc::new(EchoHandler))
            .unwrap();
        let err = mediator
            .register_query::<Echo, _>(Arc::new(EchoHandler))
            .unwrap_err();
        assert!(matches!(err, AppError::AlreadyRegisteredQuery { query: "echo" }));
    }

    #[tokio::test]
    async fn missing_handler_is_reported() {
        let mediator = InMemoryMediator::new();
        let ctx = AppContext::default();

        let err = mediator.send(&ctx, Ping(1)).await.unwrap_err();
        assert!(matches!(err, AppError::HandlerNotFound("ping")));

        let err = mediator.query(&ctx, Echo("x".into())).await.unwrap_err();
        assert!(matches!(err, AppError::HandlerNotFound("echo")));
    }

    #[tokio::test]
    async fn query_returns_the_dto() {
        let mediator = InMemoryMediator::new();
        mediator
            .register_query::<Echo, _>(Arc::new(EchoHandler))
            .unwrap();

        let dto = mediator
            .query(&AppContext::default(), Echo("hello".into()))
            .await
            .unwrap();
        assert_eq!(dto.0, "hello");
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_a_no_op() {
        let mediator = InMemoryMediator::new();
        assert_eq!(mediator.subscriber_count::<Tick>(), 0);
        mediator
            .publish(&AppContext::default(), tick())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn publish_reaches_every_subscriber_and_reports_failure() {
        let mediator = InMemoryMediator::builder()
            .config(MediatorConfig {
                handler_concurrency: 2,
            })
            .build();
        let ok_a = counter(false);
        let bad = counter(true);
        let ok_b = counter(false);
        mediator.subscribe::<Tick, _>(ok_a.clone());
        mediator.subscribe::<Tick, _>(bad.clone());
        mediator.subscribe::<Tick, _>(ok_b.clone());
        assert_eq!(mediator.subscriber_count::<Tick>(), 3);

        let err = mediator
            .publish(&AppContext::default(), tick())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(ref m) if m == "counter refused"));
        for c in [&ok_a, &bad, &ok_b] {
            assert_eq!(c.seen.load(Ordering::SeqCst), 1);
        }
    }

    #[tokio::test]
    async fn cancelled_context_short_circuits() {
        let mediator = InMemoryMediator::new();
        let handler = Arc::new(PingHandler {
            calls: AtomicUsize::new(0),
        });
        mediator.register_command::<Ping, _>(handler.clone()).unwrap();

        let ctx = AppContext::default();
        ctx.cancellation().cancel();

        let err = mediator.send(&ctx, Ping(1)).await.unwrap_err();
        assert!(matches!(err, AppError::Cancelled { operation: "ping" }));
        assert_eq!(handler.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_aborts_in_flight_handler() {
        let mediator = Arc::new(InMemoryMediator::new());
        mediator
            .register_command::<Slow, _>(Arc::new(SlowHandler))
            .unwrap();

        let ctx = AppContext::default();
        let token = ctx.cancellation().clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            token.cancel();
        });

        let err = mediator.send(&ctx, Slow).await.unwrap_err();
        assert!(matches!(err, AppError::Cancelled { operation: "slow" }));
    }
}
