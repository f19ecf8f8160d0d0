use crate::common::Market;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// # Summary
/// 已持久化的黄金价格记录。
///
/// # Invariants
/// - (market, date) 组合在存储层由唯一约束保证至多一条。
/// - 记录只由同步流程创建，创建后不再原地修改。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceRecord {
    // 数据库自增主键
    pub id: i64,
    // 所属市场
    pub market: Market,
    // 交易日 (UTC 零点)
    pub date: DateTime<Utc>,
    // 开盘价
    pub open: Option<f64>,
    // 最高价
    pub high: Option<f64>,
    // 最低价
    pub low: Option<f64>,
    // 收盘价
    pub close: f64,
    // 成交量
    pub volume: Option<f64>,
    // 服务端写入时间
    pub created_at: DateTime<Utc>,
}

/// # Summary
/// 每个市场的同步元数据，记录最近一次成功同步的时间。
///
/// # Invariants
/// - 每个市场至多一行，由 `market_type` 唯一约束保证。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncMetadata {
    // 所属市场
    pub market: Market,
    // 最近一次同步时间，从未同步过则为 None
    pub last_update: Option<DateTime<Utc>>,
}

/// # Summary
/// 用户实体，后台账号管理的基础数据。
///
/// # Invariants
/// - `username` 与 `email` 均全局唯一。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    // 数据库自增主键
    pub id: i64,
    // 登录用户名
    pub username: String,
    // 邮箱
    pub email: String,
    // 显示名称
    pub full_name: Option<String>,
    // 是否启用
    pub is_active: bool,
    // 口令（散列由上层鉴权系统负责，本服务仅存储）
    pub hashed_password: String,
    // 注册时间
    pub created_at: DateTime<Utc>,
}

/// 创建用户的输入数据。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub password: String,
    pub is_active: bool,
}

/// 更新用户的输入数据，未提供的字段保持原值。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPatch {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub password: Option<String>,
    pub is_active: Option<bool>,
}
