//! # 路由控制器集合

pub mod gold;
pub mod user;
