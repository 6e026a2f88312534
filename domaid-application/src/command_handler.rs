use crate::{command::Command, context::AppContext, error::AppResult, outcome::Outcome};
use async_trait::async_trait;
use domaid_domain::error::DomainResult;
use domaid_domain::persist::UnitOfWork;

/// 提交未生效时的失败信息
pub const COMMIT_FAILED_MESSAGE: &str = "Failed to commit data";

#[async_trait]
pub trait CommandHandler<C>: Send + Sync
where
    C: Command,
{
    async fn handle(&self, ctx: &AppContext, cmd: C) -> AppResult<Outcome>;
}

/// 命令处理器基座
///
/// 持有工作单元，并提供唯一的提交翻译点 [`commit`](Self::commit)：
/// - 工作单元报告成功：`Outcome::success()`；
/// - 工作单元报告失败：`Outcome::create().with_server_error("Failed to commit data")`；
/// - 工作单元出错：错误原样向上传播，不转换为 `Outcome`。
///
/// 具体处理器以组合方式持有基座：
///
/// ```rust
/// use async_trait::async_trait;
/// use domaid_application::command::Command;
/// use domaid_application::command_handler::{CommandHandler, CommandHandlerBase};
/// use domaid_application::context::AppContext;
/// use domaid_application::error::AppResult;
/// use domaid_application::outcome::Outcome;
/// use domaid_domain::persist::UnitOfWork;
///
/// struct Rename;
/// impl Command for Rename {
///     const NAME: &'static str = "rename";
/// }
///
/// struct RenameHandler<U> {
///     base: CommandHandlerBase<U>,
/// }
///
/// #[async_trait]
/// impl<U: UnitOfWork> CommandHandler<Rename> for RenameHandler<U> {
///     async fn handle(&self, _ctx: &AppContext, _cmd: Rename) -> AppResult<Outcome> {
///         Ok(self.base.commit().await?)
///     }
/// }
/// ```
#[derive(Clone, Debug)]
pub struct CommandHandlerBase<U> {
    unit_of_work: U,
}

impl<U: UnitOfWork> CommandHandlerBase<U> {
    pub fn new(unit_of_work: U) -> Self {
        Self { unit_of_work }
    }

    pub fn unit_of_work(&self) -> &U {
        &self.unit_of_work
    }

    /// 提交工作单元并翻译结果；每次调用恰好提交一次
    #[tracing::instrument(level = "debug", skip(self), err)]
    pub async fn commit(&self) -> DomainResult<Outcome> {
        if !self.unit_of_work.commit().await? {
            tracing::warn!("unit of work reported an unsuccessful commit");
            return Ok(Outcome::create().with_server_error(COMMIT_FAILED_MESSAGE));
        }

        Ok(Outcome::success())
    }
}
