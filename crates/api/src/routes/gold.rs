//! # 黄金价格路由控制器
//!
//! 实现 `/api/v1/gold` 路径下的 REST 接口：
//! 手动同步、区间数据、摘要、市场对比、最新价与同步元数据。

use axum::Json;
use axum::extract::{Path, Query, State};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;

use crate::error::ApiError;
use crate::server::AppState;
use crate::types::{
    ApiResponse, ComparisonResponse, LatestPricesResponse, MetadataResponse, PriceDataResponse,
    PriceRecordResponse, SummaryResponse, SyncReportResponse, SyncRequest,
};
use aurum_core::common::Market;
use aurum_service::gold::{DEFAULT_COMPARISON_WINDOW_DAYS, DEFAULT_DATA_WINDOW_DAYS};

// ============================================================
//  参数解析辅助
// ============================================================

#[derive(Deserialize, utoipa::ToSchema)]
pub struct DateRangeQuery {
    /// 开始日期 (YYYY-MM-DD，含)
    pub start_date: Option<String>,
    /// 结束日期 (YYYY-MM-DD，含)
    pub end_date: Option<String>,
}

/// 解析市场标识，非法值映射为 400。
fn parse_market(raw: &str) -> Result<Market, ApiError> {
    raw.parse::<Market>().map_err(ApiError::BadRequest)
}

/// 解析 `YYYY-MM-DD` 日期，非法格式映射为 400。
fn parse_date(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| ApiError::BadRequest(format!("日期格式错误，应为 YYYY-MM-DD: {raw}")))
}

/// 将可选的日期参数解析为闭区间，缺省为截至今天的回溯窗口。
fn resolve_range(
    start_date: Option<&str>,
    end_date: Option<&str>,
    default_days: i64,
) -> Result<(DateTime<Utc>, DateTime<Utc>), ApiError> {
    let end = match end_date {
        Some(raw) => parse_date(raw)?,
        None => Utc::now(),
    };
    let start = match start_date {
        Some(raw) => parse_date(raw)?,
        None => end - Duration::days(default_days),
    };
    if start > end {
        return Err(ApiError::BadRequest(String::from(
            "开始日期不能晚于结束日期",
        )));
    }
    Ok((start, end))
}

// ============================================================
//  Handler 实现
// ============================================================

/// 手动触发全部市场的同步
///
/// 对区间内本地数据不足的市场拉取上游数据并入库；
/// 上游不可用时自动降级为模拟数据，结果在报告的 `degraded` 字段中体现。
#[utoipa::path(
    post,
    path = "/api/v1/gold/sync",
    tag = "黄金价格 (Gold)",
    request_body = SyncRequest,
    responses(
        (status = 200, description = "同步完成，返回各市场报告", body = ApiResponse<Vec<SyncReportResponse>>),
        (status = 400, description = "日期参数错误")
    )
)]
pub async fn sync_prices(
    State(state): State<AppState>,
    Json(req): Json<SyncRequest>,
) -> Result<Json<ApiResponse<Vec<SyncReportResponse>>>, ApiError> {
    let (start, end) = resolve_range(
        req.start_date.as_deref(),
        req.end_date.as_deref(),
        DEFAULT_DATA_WINDOW_DAYS,
    )?;

    let reports = state.gold.sync_all(start, end).await?;
    let responses = reports.into_iter().map(SyncReportResponse::from).collect();
    Ok(Json(ApiResponse::ok(responses)))
}

/// 查询单个市场的区间价格数据
///
/// 区间缺省为最近 30 天；本地无数据时自动触发一次同步，
/// 同步后仍无数据返回 404。
#[utoipa::path(
    get,
    path = "/api/v1/gold/data/{market_type}",
    tag = "黄金价格 (Gold)",
    params(
        ("market_type" = String, Path, description = "市场类型 (domestic / international)"),
        ("start_date" = Option<String>, Query, description = "开始日期 YYYY-MM-DD，缺省为结束日期前 30 天"),
        ("end_date" = Option<String>, Query, description = "结束日期 YYYY-MM-DD，缺省为今天")
    ),
    responses(
        (status = 200, description = "价格数据获取成功", body = ApiResponse<PriceDataResponse>),
        (status = 400, description = "市场或日期参数错误"),
        (status = 404, description = "区间内无数据")
    )
)]
pub async fn get_price_data(
    State(state): State<AppState>,
    Path(market_type): Path<String>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<ApiResponse<PriceDataResponse>>, ApiError> {
    let market = parse_market(&market_type)?;
    let (start, end) = resolve_range(
        query.start_date.as_deref(),
        query.end_date.as_deref(),
        DEFAULT_DATA_WINDOW_DAYS,
    )?;

    let records = state.gold.get_data(market, start, end).await?;
    let response = PriceDataResponse {
        market_type: market.to_string(),
        data_count: records.len(),
        records: records.iter().map(PriceRecordResponse::from).collect(),
    };
    Ok(Json(ApiResponse::ok(response)))
}

/// 查询单个市场的近况摘要
///
/// 基于近 3 天窗口计算最新价与涨跌幅，窗口内无数据返回 404。
#[utoipa::path(
    get,
    path = "/api/v1/gold/summary/{market_type}",
    tag = "黄金价格 (Gold)",
    params(
        ("market_type" = String, Path, description = "市场类型 (domestic / international)")
    ),
    responses(
        (status = 200, description = "摘要获取成功", body = ApiResponse<SummaryResponse>),
        (status = 400, description = "市场参数错误"),
        (status = 404, description = "近期无数据")
    )
)]
pub async fn get_summary(
    State(state): State<AppState>,
    Path(market_type): Path<String>,
) -> Result<Json<ApiResponse<SummaryResponse>>, ApiError> {
    let market = parse_market(&market_type)?;
    let summary = state.gold.summary(market).await?;
    Ok(Json(ApiResponse::ok(summary.into())))
}

/// 对比两个市场的区间数据
///
/// 区间缺省为最近 7 天；任一侧无数据不算错误，计数为 0。
#[utoipa::path(
    get,
    path = "/api/v1/gold/comparison",
    tag = "黄金价格 (Gold)",
    params(
        ("start_date" = Option<String>, Query, description = "开始日期 YYYY-MM-DD，缺省为结束日期前 7 天"),
        ("end_date" = Option<String>, Query, description = "结束日期 YYYY-MM-DD，缺省为今天")
    ),
    responses(
        (status = 200, description = "对比数据获取成功", body = ApiResponse<ComparisonResponse>),
        (status = 400, description = "日期参数错误")
    )
)]
pub async fn get_comparison(
    State(state): State<AppState>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<ApiResponse<ComparisonResponse>>, ApiError> {
    let (start, end) = resolve_range(
        query.start_date.as_deref(),
        query.end_date.as_deref(),
        DEFAULT_COMPARISON_WINDOW_DAYS,
    )?;

    let comparison = state.gold.comparison(start, end).await?;
    Ok(Json(ApiResponse::ok(comparison.into())))
}

/// 查询两个市场的最新收盘价
///
/// 基于近 10 天窗口，无数据的一侧为 null。
#[utoipa::path(
    get,
    path = "/api/v1/gold/latest",
    tag = "黄金价格 (Gold)",
    responses(
        (status = 200, description = "最新价获取成功", body = ApiResponse<LatestPricesResponse>)
    )
)]
pub async fn get_latest(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<LatestPricesResponse>>, ApiError> {
    let latest = state.gold.latest().await?;
    Ok(Json(ApiResponse::ok(latest.into())))
}

/// 查询全部市场的同步元数据
#[utoipa::path(
    get,
    path = "/api/v1/gold/metadata",
    tag = "黄金价格 (Gold)",
    responses(
        (status = 200, description = "元数据获取成功", body = ApiResponse<Vec<MetadataResponse>>)
    )
)]
pub async fn get_metadata(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<MetadataResponse>>>, ApiError> {
    let meta = state.gold.metadata().await?;
    let responses = meta.iter().map(MetadataResponse::from).collect();
    Ok(Json(ApiResponse::ok(responses)))
}
