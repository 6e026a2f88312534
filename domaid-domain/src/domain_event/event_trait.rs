use super::metadata::EventMetadata;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use uuid::Uuid;

/// 事件载荷需要满足的通用能力边界（通知、集成事件与领域事件的共同基座）
pub trait Event:
    Clone + PartialEq + fmt::Debug + Serialize + DeserializeOwned + Send + Sync
{
    /// 事件类型（形如 `OrderEvent.Placed` 或自定义类型名）
    fn event_type(&self) -> &str;

    /// 事件发生时间（UTC），构造后不再变化
    fn date_occurred(&self) -> DateTime<Utc>;
}

/// 领域事件：由实体在业务操作中记录，提交成功后再由外部协作者分发
pub trait DomainEvent: Event {
    /// 事件元数据
    fn metadata(&self) -> &EventMetadata;

    /// 事件元数据（可变）
    fn metadata_mut(&mut self) -> &mut EventMetadata;

    /// 事件唯一标识，实体内部以此判定“同一个事件”
    fn event_id(&self) -> Uuid {
        self.metadata().event_id()
    }

    /// 触发该事件的实体 `code`
    fn aggregate_id(&self) -> Uuid {
        self.metadata().aggregate_id()
    }

    fn set_aggregate_id(&mut self, aggregate_id: Uuid) {
        self.metadata_mut().set_aggregate_id(aggregate_id);
    }

    /// 是否已被外部分发器成功投递
    fn is_published(&self) -> bool {
        self.metadata().is_published()
    }

    fn set_published(&mut self, published: bool) {
        self.metadata_mut().set_published(published);
    }
}
