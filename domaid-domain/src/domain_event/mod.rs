//! 事件（Event）与领域事件（Domain Event）
//!
//! 定义事件载荷需要实现的最小接口（`Event` / `DomainEvent`）、领域事件元数据
//! `EventMetadata`，以及实体内部暂存待分发事件的有序集合 `DomainEvents`。

mod event_trait;
mod metadata;
mod pending_events;

pub use event_trait::{DomainEvent, Event};
pub use metadata::EventMetadata;
pub use pending_events::DomainEvents;
