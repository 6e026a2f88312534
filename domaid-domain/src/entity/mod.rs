//! 实体（Entity）基础抽象
//!
//! 为所有持久化的聚合根提供统一的身份、审计时间、软删除标记，
//! 以及在业务操作中暂存领域事件的能力。
//!
//! 审计字段（`id`/`created_at`/`last_update`）对业务代码只读，
//! 写入只能经由 `mapping` 模块提供的持久化映射接口完成；
//! 该模块需启用 `mapping` 特性，仅供仓储/基础设施一侧使用。
//!
#[cfg(any(test, feature = "mapping"))]
pub mod mapping;

use crate::domain_event::{DomainEvent, DomainEvents};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 实体公共状态，由具体实体以组合方式持有（通常借助 `#[entity]` 宏注入）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityBase<E> {
    /// 存储层分配的代理主键，首次持久化前为 0
    id: i64,
    /// 对外稳定标识，构造时生成
    code: Uuid,
    created_at: DateTime<Utc>,
    last_update: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
    #[serde(skip, default = "DomainEvents::default")]
    domain_events: DomainEvents<E>,
}

impl<E> Default for EntityBase<E> {
    fn default() -> Self {
        Self::with_code(Uuid::new_v4())
    }
}

impl<E> EntityBase<E> {
    /// 以随机 `code` 创建
    pub fn new() -> Self {
        Self::default()
    }

    /// 以指定 `code` 创建，仅供具体实体的构造函数使用
    pub fn with_code(code: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            code,
            created_at: now,
            last_update: now,
            deleted_at: None,
            domain_events: DomainEvents::default(),
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn code(&self) -> Uuid {
        self.code
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_update(&self) -> DateTime<Utc> {
        self.last_update
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    pub fn deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// 软删除：`deleted_at` 与 `last_update` 取同一时刻
    ///
    /// 重复删除会刷新 `deleted_at`，但不会使其早于上一次的值，也不会清除它。
    pub fn delete(&mut self) {
        let now = self.now();
        if let Some(previous) = self.deleted_at {
            tracing::debug!(code = %self.code, %previous, "entity deleted again, refreshing deleted_at");
        }
        self.deleted_at = Some(self.deleted_at.map_or(now, |previous| previous.max(now)));
        self.last_update = now;
    }

    /// 将 `last_update` 刷新为当前时间，已删除的实体同样适用
    #[doc(alias = "set_last_updated_date_now")]
    pub fn touch(&mut self) {
        self.last_update = self.now();
    }

    // 墙钟可能回拨，保证 last_update >= created_at
    fn now(&self) -> DateTime<Utc> {
        Utc::now().max(self.created_at)
    }
}

impl<E> EntityBase<E>
where
    E: DomainEvent,
{
    /// 当前待分发事件的只读视图
    pub fn domain_events(&self) -> &[E] {
        self.domain_events.as_slice()
    }

    pub fn add_domain_event(&mut self, event: E) {
        self.domain_events.push(event);
    }

    pub fn remove_domain_event(&mut self, event: &E) {
        self.domain_events.remove(event);
    }

    pub fn clear_domain_events(&mut self) {
        self.domain_events.clear();
    }

    pub fn take_domain_events(&mut self) -> Vec<E> {
        self.domain_events.take()
    }
}

/// 具备持久身份的领域对象
///
/// 实现者只需提供 `base`/`base_mut`，其余能力均为默认方法。
///
/// 业务代码只能读取审计字段；未启用 `mapping` 特性时，映射接口不可见：
///
#[cfg_attr(not(feature = "mapping"), doc = "```compile_fail")]
#[cfg_attr(feature = "mapping", doc = "```")]
/// use domaid_domain::entity::mapping::EntityMapping;
/// ```
pub trait Entity: Send + Sync {
    /// 该实体记录的领域事件类型
    type Event: DomainEvent;

    fn base(&self) -> &EntityBase<Self::Event>;

    fn base_mut(&mut self) -> &mut EntityBase<Self::Event>;

    fn id(&self) -> i64 {
        self.base().id()
    }

    fn code(&self) -> Uuid {
        self.base().code()
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.base().created_at()
    }

    fn last_update(&self) -> DateTime<Utc> {
        self.base().last_update()
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.base().deleted_at()
    }

    fn deleted(&self) -> bool {
        self.base().deleted()
    }

    fn delete(&mut self) {
        self.base_mut().delete();
    }

    #[doc(alias = "set_last_updated_date_now")]
    fn touch(&mut self) {
        self.base_mut().touch();
    }

    /// 待分发事件的只读视图
    fn domain_events(&self) -> &[Self::Event] {
        self.base().domain_events()
    }

    /// 追加事件（保持 FIFO，不做任何校验，允许重复）
    fn add_domain_event(&mut self, event: Self::Event) {
        self.base_mut().add_domain_event(event);
    }

    /// 移除第一个同一标识的事件；不存在时为空操作
    fn remove_domain_event(&mut self, event: &Self::Event) {
        self.base_mut().remove_domain_event(event);
    }

    fn clear_domain_events(&mut self) {
        self.base_mut().clear_domain_events();
    }

    /// 取出全部待分发事件并清空
    fn take_domain_events(&mut self) -> Vec<Self::Event> {
        self.base_mut().take_domain_events()
    }
}
