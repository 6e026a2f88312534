use serde::Serialize;

/// 数据传输对象（DTO）
///
/// 查询的输出载体，与领域模型解耦，避免将实体直接暴露到接口层。
pub trait Dto: Serialize + Send + Sync + 'static {}

impl<T: Dto> Dto for Vec<T> {}

impl<T: Dto> Dto for Option<T> {}
