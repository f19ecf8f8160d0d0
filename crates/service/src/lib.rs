//! # `aurum-service` - 应用服务层
//!
//! 系统的门面 (Facade)：
//! - `GoldPriceService`: 同步协调 + 区间 / 摘要 / 对比 / 最新价查询
//! - `UserService`: 用户账号管理
//!
//! 编译期仅依赖 `aurum-core` 中的 Trait 定义与 `aurum-feed` 的数据源门面，
//! 具体存储实现通过构造函数注入。

pub mod gold;
pub mod user;
