//! DomAid 领域层基础库（domaid-domain）
//!
//! 提供领域驱动设计中最常用的基类与协议：
//! - 实体（`entity`）：身份、审计时间、软删除，以及待分发领域事件的暂存；
//! - 领域事件（`domain_event`）：事件基座、元数据与有序事件集合；
//! - 持久化协议（`persist`）：读写仓储与工作单元；
//! - 统一错误（`error`）。
//!
//! 本 crate 不绑定任何存储或传输实现，仅定义领域层接口。
//!
//! 典型流程：
//! 1. 业务操作修改一个或多个实体，实体在本地记录领域事件；
//! 2. 应用层提交工作单元；
//! 3. 提交成功后由调用方取出各实体的待分发事件并发布。
//!
pub mod domain_event;
pub mod entity;
pub mod error;
pub mod persist;

// 宏生成代码及下游实现者通过这里引用时间与标识类型，免去额外依赖
pub use chrono;
pub use uuid;

// 允许在本 crate 内部通过 ::domaid_domain 进行自引用，
// 以便过程宏在本 crate 的单元测试中也能解析到 ::domaid_domain 路径。
extern crate self as domaid_domain;
