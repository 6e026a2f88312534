//! DomAid 过程宏
//!
//! - `#[entity(event = E)]`：注入 `base: EntityBase<E>` 并实现 `Entity`
//! - `#[domain_event]`：注入 `metadata: EventMetadata` 并实现 `Event`/`DomainEvent`
//!
use proc_macro::TokenStream;

mod domain_event;
mod entity;
mod utils;

/// 实体宏
///
/// ```ignore
/// #[entity(event = OrderEvent)]
/// struct Order {
///     total: i64,
/// }
/// ```
///
/// 展开后 `Order` 拥有字段 `base: EntityBase<OrderEvent>`，
/// 并派生 `Debug`（可用 `debug = false` 关闭）、`Serialize`、`Deserialize`。
#[proc_macro_attribute]
pub fn entity(attr: TokenStream, item: TokenStream) -> TokenStream {
    entity::expand(attr, item)
}

/// 领域事件宏
///
/// ```ignore
/// #[domain_event]
/// enum OrderEvent {
///     Placed { total: i64 },
///     #[event(event_type = "order.cancelled")]
///     Cancelled { reason: String },
/// }
/// ```
///
/// 每个变体（或结构体本身）会补齐 `metadata: EventMetadata` 字段。
#[proc_macro_attribute]
pub fn domain_event(attr: TokenStream, item: TokenStream) -> TokenStream {
    domain_event::expand(attr, item)
}
