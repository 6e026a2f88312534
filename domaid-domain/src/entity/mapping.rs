//! 持久化映射接口
//!
//! 业务代码只能读取审计字段；仓储/映射层通过本模块写入：
//! - [`EntityMapping`]：为任意实体提供 `with_id`/`with_created_at`/`with_last_update`；
//! - [`PersistedEntity`] + [`EntityBase::rehydrate`]：从存储记录重建实体公共状态，
//!   不重新生成 `code`，也不携带待分发事件。
//!
use super::{Entity, EntityBase};
use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 审计字段写入接口（仅供仓储/映射层使用）
///
/// 映射路径按存储记录原样写入，不校验实体不变量
/// （如 `last_update >= created_at`）；记录的一致性由调用方保证。
pub trait EntityMapping: Entity + Sized {
    fn with_id(mut self, id: i64) -> Self {
        self.base_mut().id = id;
        self
    }

    fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.base_mut().created_at = created_at;
        self
    }

    fn with_last_update(mut self, last_update: DateTime<Utc>) -> Self {
        self.base_mut().last_update = last_update;
        self
    }
}

impl<T> EntityMapping for T where T: Entity {}

/// 实体公共状态的存储形态
#[derive(Builder, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedEntity {
    id: i64,
    code: Uuid,
    created_at: DateTime<Utc>,
    last_update: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl PersistedEntity {
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
}

impl<E> EntityBase<E> {
    /// 从存储记录重建，绕过业务构造逻辑
    pub fn rehydrate(record: PersistedEntity) -> Self {
        let mut base = Self::with_code(record.code);
        base.id = record.id;
        base.created_at = record.created_at;
        base.last_update = record.last_update;
        base.deleted_at = record.deleted_at;
        base
    }

    /// 导出存储记录
    pub fn to_persisted(&self) -> PersistedEntity {
        PersistedEntity {
            id: self.id,
            code: self.code,
            created_at: self.created_at,
            last_update: self.last_update,
            deleted_at: self.deleted_at,
        }
    }
}
