//! 工作单元（Unit of Work）协议
//!
//! 事务边界的抽象，本库只依赖其提交操作。
//!
use crate::error::DomainResult as Result;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// 提交暂存的全部变更
    ///
    /// - `Ok(true)`：变更已持久化；
    /// - `Ok(false)`：已尝试提交但明确失败（回滚由实现方负责）；
    /// - `Err(_)`：非预期的基础设施故障。
    async fn commit(&self) -> Result<bool>;
}

#[async_trait]
impl<T> UnitOfWork for Arc<T>
where
    T: UnitOfWork + ?Sized,
{
    async fn commit(&self) -> Result<bool> {
        (**self).commit().await
    }
}

#[async_trait]
impl<T> UnitOfWork for Box<T>
where
    T: UnitOfWork + ?Sized,
{
    async fn commit(&self) -> Result<bool> {
        (**self).commit().await
    }
}
