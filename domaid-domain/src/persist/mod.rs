//! 持久化协议（persist）
//!
//! 定义实体读写仓储与工作单元的接口：
//! - `ReadRepository` / `WriteRepository`：按实体类型参数化的异步仓储；
//! - `UnitOfWork`：事务提交边界，提交结果以布尔值表达。
//!
//! 该模块只描述协议，具体存储后端由上层提供实现并注入。
//!
mod repository;
mod unit_of_work;

pub use repository::{ReadRepository, Repository, WriteRepository};
pub use unit_of_work::UnitOfWork;
