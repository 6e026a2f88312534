//! 仓储协议
//!
//! 按实体类型参数化的读写仓储接口，仅定义形状，不包含实现。
//! 写操作以借用方式接收实体，调用方在提交后仍持有实体以分发其领域事件。
//!
use crate::{entity::Entity, error::DomainResult as Result};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// 仓储标记接口
pub trait Repository<E>: Send + Sync
where
    E: Entity,
{
}

/// 只读仓储
#[async_trait]
pub trait ReadRepository<E>: Repository<E>
where
    E: Entity,
{
    async fn get_all(&self) -> Result<Vec<E>>;

    /// 按对外标识 `code` 查找
    async fn find(&self, code: Uuid) -> Result<Option<E>>;

    /// 批量查找；未命中的标识被忽略
    async fn find_many(&self, codes: &[Uuid]) -> Result<Vec<E>>;
}

/// 可写仓储：变更仅暂存于工作单元，由 `UnitOfWork::commit` 统一落盘
#[async_trait]
pub trait WriteRepository<E>: Repository<E>
where
    E: Entity,
{
    async fn add(&self, entity: &E) -> Result<()>;

    async fn add_many(&self, entities: &[E]) -> Result<()>;

    async fn remove(&self, entity: &E) -> Result<()>;

    async fn remove_many(&self, entities: &[E]) -> Result<()>;

    async fn update(&self, entity: &E) -> Result<()>;

    async fn update_many(&self, entities: &[E]) -> Result<()>;
}

impl<E, T> Repository<E> for Arc<T>
where
    E: Entity,
    T: Repository<E> + ?Sized,
{
}

#[async_trait]
impl<E, T> ReadRepository<E> for Arc<T>
where
    E: Entity,
    T: ReadRepository<E> + ?Sized,
{
    async fn get_all(&self) -> Result<Vec<E>> {
        (**self).get_all().await
    }

    async fn find(&self, code: Uuid) -> Result<Option<E>> {
        (**self).find(code).await
    }

    async fn find_many(&self, codes: &[Uuid]) -> Result<Vec<E>> {
        (**self).find_many(codes).await
    }
}

#[async_trait]
impl<E, T> WriteRepository<E> for Arc<T>
where
    E: Entity,
    T: WriteRepository<E> + ?Sized,
{
    async fn add(&self, entity: &E) -> Result<()> {
        (**self).add(entity).await
    }

    async fn add_many(&self, entities: &[E]) -> Result<()> {
        (**self).add_many(entities).await
    }

    async fn remove(&self, entity: &E) -> Result<()> {
        (**self).remove(entity).await
    }

    async fn remove_many(&self, entities: &[E]) -> Result<()> {
        (**self).remove_many(entities).await
    }

    async fn update(&self, entity: &E) -> Result<()> {
        (**self).update(entity).await
    }

    async fn update_many(&self, entities: &[E]) -> Result<()> {
        (**self).update_many(entities).await
    }
}
