use crate::outcome::Outcome;

/// 应用层命令（Command）
///
/// 表达“意图”的写操作请求，通常会修改领域状态。
/// - 执行结果以 [`Outcome`] 表达，不返回业务数据；
/// - 与 [`Query`](crate::query::Query) 相对，`Command` 应避免读写混用；
/// - 建议保持语义化的“动宾结构”命名，如 `CreateUser`、`CloseOrder`。
///
/// 关联常量：
/// - `NAME`：命令的稳定名称，用于日志、追踪与路由。避免依赖 `type_name::<T>()`。
pub trait Command: Send + Sync + 'static {
    /// 命令的稳定名称（建议常量字符串，不随重构变化）
    const NAME: &'static str;

    /// 校验命令自身状态
    ///
    /// 提交流程不会自动调用；由处理器决定何时校验以及如何处理失败。
    fn validate(&self) -> Outcome {
        Outcome::success()
    }
}
