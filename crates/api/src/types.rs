//! # DTO (Data Transfer Object) 层
//!
//! 将内部领域模型转化为面向前端 JSON 输出的轻量结构体。
//! 所有 DTO 必须派生 `utoipa::ToSchema` 以自动进入 Swagger 文档。

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use aurum_core::store::entity::{PriceRecord, SyncMetadata, User};
use aurum_service::gold::{
    LatestPrice, LatestPrices, MarketComparison, MarketSlice, MarketSummary, SyncReport,
};

// ============================================================
//  黄金价格相关 DTO
// ============================================================

/// 价格记录 DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PriceRecordResponse {
    /// 记录 ID
    #[schema(example = 1)]
    pub id: i64,
    /// 市场类型 (domestic / international)
    #[schema(example = "domestic")]
    pub market_type: String,
    /// 交易日
    #[schema(example = "2026-03-02")]
    pub date: String,
    /// 开盘价
    #[schema(example = 450.12)]
    pub open: Option<f64>,
    /// 最高价
    #[schema(example = 455.78)]
    pub high: Option<f64>,
    /// 最低价
    #[schema(example = 448.3)]
    pub low: Option<f64>,
    /// 收盘价
    #[schema(example = 452.6)]
    pub close: f64,
    /// 成交量
    #[schema(example = 5000.0)]
    pub volume: Option<f64>,
    /// 服务端写入时间 (ISO 8601)
    #[schema(example = "2026-03-02T08:00:00Z")]
    pub created_at: String,
}

/// 触发同步请求体，日期缺省为最近 30 天
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SyncRequest {
    /// 开始日期 (YYYY-MM-DD，含)
    #[schema(example = "2026-03-01")]
    pub start_date: Option<String>,
    /// 结束日期 (YYYY-MM-DD，含)
    #[schema(example = "2026-03-31")]
    pub end_date: Option<String>,
}

/// 单个市场的同步结果 DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SyncReportResponse {
    /// 市场类型
    #[schema(example = "domestic")]
    pub market_type: String,
    /// 是否实际触发了上游拉取
    #[schema(example = true)]
    pub synced: bool,
    /// 新插入的行数
    #[schema(example = 22)]
    pub saved_count: u64,
    /// 同步后区间内的总行数
    #[schema(example = 30)]
    pub data_count: usize,
    /// 数据是否来自降级的模拟生成
    #[schema(example = false)]
    pub degraded: bool,
    /// 说明文字
    #[schema(example = "同步完成，新增 22 条记录")]
    pub message: String,
}

/// 区间数据查询结果 DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PriceDataResponse {
    /// 市场类型
    #[schema(example = "domestic")]
    pub market_type: String,
    /// 记录条数
    #[schema(example = 30)]
    pub data_count: usize,
    /// 升序的价格记录
    pub records: Vec<PriceRecordResponse>,
}

/// 市场摘要 DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SummaryResponse {
    /// 市场类型
    #[schema(example = "international")]
    pub market_type: String,
    /// 最新收盘价
    #[schema(example = 1950.0)]
    pub latest_price: f64,
    /// 最新记录的交易日
    #[schema(example = "2026-03-11")]
    pub latest_date: String,
    /// 次新收盘价
    #[schema(example = 1900.0)]
    pub previous_price: Option<f64>,
    /// 涨跌额
    #[schema(example = 50.0)]
    pub change: Option<f64>,
    /// 涨跌幅 (%)
    #[schema(example = 2.63)]
    pub change_percent: Option<f64>,
    /// 最新成交量
    #[schema(example = 5000.0)]
    pub volume: Option<f64>,
}

/// 对比结果中单个市场的切片 DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MarketSliceResponse {
    /// 市场类型
    #[schema(example = "domestic")]
    pub market_type: String,
    /// 记录条数
    #[schema(example = 7)]
    pub data_count: usize,
    /// 升序的价格记录
    pub records: Vec<PriceRecordResponse>,
}

/// 两个市场的并列对比 DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ComparisonResponse {
    /// 开始日期
    #[schema(example = "2026-03-05")]
    pub start_date: String,
    /// 结束日期
    #[schema(example = "2026-03-11")]
    pub end_date: String,
    /// 国内市场切片
    pub domestic: MarketSliceResponse,
    /// 国际市场切片
    pub international: MarketSliceResponse,
}

/// 单个市场的最新价 DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LatestPriceResponse {
    /// 市场类型
    #[schema(example = "domestic")]
    pub market_type: String,
    /// 最新收盘价
    #[schema(example = 452.6)]
    pub price: f64,
    /// 对应交易日
    #[schema(example = "2026-03-11")]
    pub date: String,
}

/// 双市场最新价快照 DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LatestPricesResponse {
    /// 国内市场最新价，暂无数据时为 null
    pub domestic: Option<LatestPriceResponse>,
    /// 国际市场最新价，暂无数据时为 null
    pub international: Option<LatestPriceResponse>,
    /// 快照生成时间 (ISO 8601)
    #[schema(example = "2026-03-11T08:00:00Z")]
    pub timestamp: String,
}

/// 同步元数据 DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MetadataResponse {
    /// 市场类型
    #[schema(example = "domestic")]
    pub market_type: String,
    /// 最近一次同步时间 (ISO 8601)
    #[schema(example = "2026-03-11T08:00:00Z")]
    pub last_update: Option<String>,
}

// ============================================================
//  用户相关 DTO
// ============================================================

/// 创建用户请求体
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    /// 登录用户名
    #[schema(example = "trader_01")]
    pub username: String,
    /// 邮箱
    #[schema(example = "trader01@example.com")]
    pub email: String,
    /// 显示名称
    #[schema(example = "Trader One")]
    pub full_name: Option<String>,
    /// 口令
    #[schema(example = "P@ssw0rd!")]
    pub password: String,
    /// 是否启用，缺省为 true
    #[schema(example = true)]
    pub is_active: Option<bool>,
}

/// 更新用户请求体，未提供的字段保持原值
#[derive(Debug, Clone, Serialize, Deserialize, Default, ToSchema)]
pub struct UpdateUserRequest {
    /// 邮箱
    #[schema(example = "trader01@new.example.com")]
    pub email: Option<String>,
    /// 显示名称
    #[schema(example = "Trader One")]
    pub full_name: Option<String>,
    /// 口令
    #[schema(example = "NewP@ssw0rd!")]
    pub password: Option<String>,
    /// 是否启用
    #[schema(example = false)]
    pub is_active: Option<bool>,
}

/// 用户信息响应 DTO，不回传口令字段
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    /// 用户 ID
    #[schema(example = 1)]
    pub id: i64,
    /// 登录用户名
    #[schema(example = "trader_01")]
    pub username: String,
    /// 邮箱
    #[schema(example = "trader01@example.com")]
    pub email: String,
    /// 显示名称
    #[schema(example = "Trader One")]
    pub full_name: Option<String>,
    /// 是否启用
    #[schema(example = true)]
    pub is_active: bool,
    /// 注册时间 (ISO 8601)
    #[schema(example = "2026-03-01T00:00:00Z")]
    pub created_at: String,
}

// ============================================================
//  通用响应 DTO
// ============================================================

/// 统一 API 响应包装器
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T: Serialize + ToSchema> {
    /// 是否成功
    pub success: bool,
    /// 数据载荷 (成功时)
    pub data: Option<T>,
    /// 错误信息 (失败时)
    pub error: Option<String>,
}

impl<T: Serialize + ToSchema> ApiResponse<T> {
    /// 构建成功响应
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// 构建失败响应 (不含泛型载荷)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 固定为 false
    pub success: bool,
    /// 错误描述信息
    pub error: String,
}

impl ApiErrorResponse {
    /// 从错误信息构建
    pub fn from_msg(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: msg.into(),
        }
    }
}

/// 健康检查响应
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// 固定为 "ok"
    #[schema(example = "ok")]
    pub status: String,
}

// ============================================================
//  领域模型 → DTO 惯用转换 (impl From<T>)
// ============================================================

impl From<&PriceRecord> for PriceRecordResponse {
    fn from(r: &PriceRecord) -> Self {
        Self {
            id: r.id,
            market_type: r.market.to_string(),
            date: r.date.format("%Y-%m-%d").to_string(),
            open: r.open,
            high: r.high,
            low: r.low,
            close: r.close,
            volume: r.volume,
            created_at: r.created_at.to_rfc3339(),
        }
    }
}

impl From<SyncReport> for SyncReportResponse {
    fn from(r: SyncReport) -> Self {
        Self {
            market_type: r.market.to_string(),
            synced: r.synced,
            saved_count: r.saved_count,
            data_count: r.data_count,
            degraded: r.degraded,
            message: r.message,
        }
    }
}

impl From<MarketSummary> for SummaryResponse {
    fn from(s: MarketSummary) -> Self {
        Self {
            market_type: s.market.to_string(),
            latest_price: s.latest_price,
            latest_date: s.latest_date.format("%Y-%m-%d").to_string(),
            previous_price: s.previous_price,
            change: s.change,
            change_percent: s.change_percent,
            volume: s.volume,
        }
    }
}

impl From<MarketSlice> for MarketSliceResponse {
    fn from(s: MarketSlice) -> Self {
        Self {
            market_type: s.market.to_string(),
            data_count: s.data_count,
            records: s.records.iter().map(PriceRecordResponse::from).collect(),
        }
    }
}

impl From<MarketComparison> for ComparisonResponse {
    fn from(c: MarketComparison) -> Self {
        Self {
            start_date: c.start.format("%Y-%m-%d").to_string(),
            end_date: c.end.format("%Y-%m-%d").to_string(),
            domestic: c.domestic.into(),
            international: c.international.into(),
        }
    }
}

impl From<LatestPrice> for LatestPriceResponse {
    fn from(p: LatestPrice) -> Self {
        Self {
            market_type: p.market.to_string(),
            price: p.price,
            date: p.date.format("%Y-%m-%d").to_string(),
        }
    }
}

impl From<LatestPrices> for LatestPricesResponse {
    fn from(p: LatestPrices) -> Self {
        Self {
            domestic: p.domestic.map(Into::into),
            international: p.international.map(Into::into),
            timestamp: p.timestamp.to_rfc3339(),
        }
    }
}

impl From<&SyncMetadata> for MetadataResponse {
    fn from(m: &SyncMetadata) -> Self {
        Self {
            market_type: m.market.to_string(),
            last_update: m.last_update.map(|t| t.to_rfc3339()),
        }
    }
}

impl From<&User> for UserResponse {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            username: u.username.clone(),
            email: u.email.clone(),
            full_name: u.full_name.clone(),
            is_active: u.is_active,
            created_at: u.created_at.to_rfc3339(),
        }
    }
}
