//! # `aurum-store` - SQLite 持久化层
//!
//! `aurum-core` 存储端口的 SQLite 实现：
//! - `SqliteGoldStore`: 价格记录与同步元数据 (`gold.db`)
//! - `SqliteUserStore`: 用户账号 (`app.db`)
//!
//! 数据根目录通过 `config::set_root_dir` 注入（测试中指向临时目录）。

pub mod config;
pub mod gold;
pub mod user;
