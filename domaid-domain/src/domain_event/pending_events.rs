use std::ops::Deref;
use std::slice::Iter;
use std::vec::IntoIter;

use super::event_trait::DomainEvent;

/// 实体待分发的领域事件集合，按记录顺序（FIFO）排列
///
/// 对外只暴露只读视图（`&[E]`）；写操作仅由所属实体发起。
/// 事件以 `event_id` 判定同一性：同一事件可被重复加入，移除时只移除第一个匹配项。
#[derive(Debug, Clone)]
pub struct DomainEvents<E> {
    events: Vec<E>,
}

impl<E> Default for DomainEvents<E> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<E> DomainEvents<E>
where
    E: DomainEvent,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, event: E) {
        self.events.push(event);
    }

    /// 移除第一个与 `event` 同一标识的事件；不存在时什么也不做
    pub(crate) fn remove(&mut self, event: &E) -> bool {
        let event_id = event.event_id();
        match self.events.iter().position(|e| e.event_id() == event_id) {
            Some(idx) => {
                self.events.remove(idx);
                true
            }
            None => false,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.events.clear();
    }

    /// 取出全部事件并清空集合
    pub(crate) fn take(&mut self) -> Vec<E> {
        std::mem::take(&mut self.events)
    }

    /// 只读视图
    pub fn as_slice(&self) -> &[E] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, E> {
        self.events.iter()
    }
}

impl<E> Deref for DomainEvents<E> {
    type Target = [E];

    fn deref(&self) -> &Self::Target {
        &self.events
    }
}

impl<'a, E> IntoIterator for &'a DomainEvents<E> {
    type Item = &'a E;
    type IntoIter = Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

impl<E> IntoIterator for DomainEvents<E> {
    type Item = E;
    type IntoIter = IntoIter<E>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}
