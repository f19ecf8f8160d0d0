//! # `aurum-feed` - 行情数据源
//!
//! 黄金价格的上游抓取实现：国内现货 JSON 接口与 Yahoo Finance (GLD)。
//! `GoldFeed` 适配器将两个数据源收拢到一个入口，并在上游失败时
//! 降级为可复现的模拟数据，调用方永远不会收到抓取错误。

pub mod adapter;
pub mod domestic;
pub mod international;
pub mod synthetic;
