use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 领域事件元数据
///
/// `date_occurred` 仅在构造时确定；`is_published` 由外部分发器在投递成功后置位，
/// 本库自身从不修改它。
#[derive(Builder, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    #[builder(default = Uuid::new_v4())]
    event_id: Uuid,
    #[builder(default = Utc::now())]
    date_occurred: DateTime<Utc>,
    aggregate_id: Uuid,
    #[builder(default)]
    is_published: bool,
}

impl EventMetadata {
    /// 为指定实体创建一份新的事件元数据（新标识、当前时间、未发布）
    pub fn new(aggregate_id: Uuid) -> Self {
        Self::builder().aggregate_id(aggregate_id).build()
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn date_occurred(&self) -> DateTime<Utc> {
        self.date_occurred
    }

    pub fn aggregate_id(&self) -> Uuid {
        self.aggregate_id
    }

    pub fn set_aggregate_id(&mut self, aggregate_id: Uuid) {
        self.aggregate_id = aggregate_id;
    }

    pub fn is_published(&self) -> bool {
        self.is_published
    }

    pub fn set_published(&mut self, published: bool) {
        self.is_published = published;
    }
}
