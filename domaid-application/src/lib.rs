//! DomAid 应用层（domaid-application）
//!
//! - 命令/查询/通知协议与处理器（`command`、`query`、`notification`）；
//! - 提交协议（`command_handler::CommandHandlerBase`）：把工作单元的提交结果翻译为 [`Outcome`]；
//! - 中介者（`mediator`）及进程内实现（`in_memory_mediator`）；
//! - 提交成功后的领域事件分发（`dispatch`）。
//!
pub mod command;
pub mod command_handler;
pub mod context;
pub mod dispatch;
pub mod dto;
pub mod error;
pub mod in_memory_mediator;
pub mod mediator;
pub mod notification;
pub mod outcome;
pub mod query;
pub mod query_handler;

pub use in_memory_mediator::{InMemoryMediator, MediatorConfig};
pub use outcome::Outcome;
