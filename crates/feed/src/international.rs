use async_trait::async_trait;
use aurum_core::common::{Market, day_floor};
use aurum_core::feed::entity::PricePoint;
use aurum_core::feed::error::FeedError;
use aurum_core::feed::port::GoldProvider;
use chrono::{DateTime, Duration, TimeZone, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration as StdDuration;

// 国际金价跟踪标的：黄金 ETF
const GOLD_SYMBOL: &str = "GLD";

/// # Summary
/// 国际黄金行情提供者，基于 Yahoo Finance v8 chart 接口抓取 GLD 日线。
///
/// # Invariants
/// - 使用 `reqwest` 异步客户端进行通讯。
/// - 上游约定为 `YYYY-MM-DD` 日界；请求时转换为对应的 epoch 秒。
pub struct YahooGoldProvider {
    /// 内部使用的 HTTP 客户端
    client: Client,
}

impl YahooGoldProvider {
    /// # Summary
    /// 创建一个新的 YahooGoldProvider 实例。
    ///
    /// # Logic
    /// 1. 配置超时，上游挂起按抓取失败处理。
    /// 2. 设置伪装浏览器 Header (User-Agent) 以减少被拦截风险。
    ///
    /// # Arguments
    /// * `timeout`: 请求超时。
    ///
    /// # Returns
    /// 返回初始化后的 YahooGoldProvider。
    pub fn new(timeout: StdDuration) -> Self {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
            ),
        );

        Self {
            client: Client::builder()
                .timeout(timeout)
                .default_headers(headers)
                .build()
                .expect("Failed to build HTTP client"),
        }
    }
}

/// # Summary
/// Yahoo API 响应顶层结构。
///
/// # Invariants
/// - 映射自 Yahoo v8 chart 接口。
#[derive(Deserialize, Debug)]
struct YahooResponse {
    chart: YahooChart,
}

/// Yahoo API 图表数据部分。
#[derive(Deserialize, Debug)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

/// Yahoo API 错误详情。
#[derive(Deserialize, Debug)]
struct YahooError {
    description: String,
}

/// Yahoo API 单个时间序列结果。
#[derive(Deserialize, Debug)]
struct YahooResult {
    timestamp: Vec<i64>,
    indicators: YahooIndicators,
}

/// Yahoo API 指标容器。
#[derive(Deserialize, Debug)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

/// Yahoo API 原始报价数据，数组槽位可能为 null。
#[derive(Deserialize, Debug)]
struct YahooQuote {
    /// 开盘价列表
    open: Vec<Option<f64>>,
    /// 最高价列表
    high: Vec<Option<f64>>,
    /// 最低价列表
    low: Vec<Option<f64>>,
    /// 收盘价列表
    close: Vec<Option<f64>>,
    /// 成交量列表
    volume: Vec<Option<f64>>,
}

#[async_trait]
impl GoldProvider for YahooGoldProvider {
    /// # Summary
    /// 从 Yahoo Finance 抓取 GLD 日线历史数据。
    ///
    /// # Logic
    /// 1. 将闭区间 `[start, end]` 转换为 `period1`/`period2` epoch 秒
    ///    （end 加一天作为开区间上界，保证末日纳入）。
    /// 2. 发起异步请求并解析嵌套的 JSON 数据。
    /// 3. 逐槽位归一化：null 的开/高/低/量映射为 `None`，null 收盘价填 `0.0`；
    ///    时间戳归一化到 UTC 日零点。
    ///
    /// # Arguments
    /// * `start`: 开始日期。
    /// * `end`: 结束日期（含）。
    ///
    /// # Returns
    /// 成功返回数据点列表，失败返回 `FeedError`。
    async fn fetch_daily(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PricePoint>, FeedError> {
        let url = format!(
            "https://query1.finance.yahoo.com/v8/finance/chart/{}",
            GOLD_SYMBOL
        );
        let period1 = day_floor(start).timestamp();
        let period2 = (day_floor(end) + Duration::days(1)).timestamp();

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("period1", period1.to_string().as_str()),
                ("period2", period2.to_string().as_str()),
                ("interval", "1d"),
            ])
            .send()
            .await
            .map_err(|e| FeedError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(FeedError::Network(format!("HTTP {}", resp.status())));
        }

        let json: YahooResponse = resp
            .json()
            .await
            .map_err(|e| FeedError::Parse(e.to_string()))?;

        if let Some(err) = json.chart.error {
            return Err(FeedError::Unknown(err.description));
        }

        let result = json
            .chart
            .result
            .and_then(|mut v| v.pop())
            .ok_or(FeedError::NotFound)?;

        let quote = result
            .indicators
            .quote
            .first()
            .ok_or(FeedError::Parse("No quote data".into()))?;

        let mut points = Vec::with_capacity(result.timestamp.len());
        for (i, &ts) in result.timestamp.iter().enumerate() {
            let date = Utc
                .timestamp_opt(ts, 0)
                .single()
                .ok_or_else(|| FeedError::Parse(format!("Bad timestamp {}", ts)))?;

            points.push(PricePoint {
                market: Market::International,
                date: day_floor(date),
                open: quote.open.get(i).copied().flatten(),
                high: quote.high.get(i).copied().flatten(),
                low: quote.low.get(i).copied().flatten(),
                close: quote.close.get(i).copied().flatten().unwrap_or(0.0),
                volume: quote.volume.get(i).copied().flatten(),
            });
        }

        Ok(points)
    }
}
