//! # `aurum-api` - HTTP API 网关
//!
//! Aurum 黄金价格服务的 HTTP/REST 入口。
//! 使用 `axum` 构建路由与控制器，通过 `utoipa` 自动生成 OpenAPI 3.0 Swagger 文档。
//!
//! ## 架构职责
//! - 接收来自浏览器或前端应用的 HTTP 请求
//! - 校验市场标识与日期参数后分发至对应 Handler
//! - 调用下层 `GoldPriceService` / `UserService` 完成业务操作
//! - 将领域模型转换为 DTO 返回给前端

pub mod error;
pub mod routes;
pub mod server;
pub mod types;
