//! # `aurum-core` - 领域核心
//!
//! 黄金价格后端的领域层：实体、端口 (Trait) 与错误定义。
//! 本 crate 不依赖任何具体基础设施（数据库、HTTP 客户端），
//! 所有实现均由外层 crate 通过依赖注入提供。

pub mod common;
pub mod config;
pub mod feed;
pub mod store;
