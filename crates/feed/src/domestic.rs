use async_trait::async_trait;
use aurum_core::common::Market;
use aurum_core::feed::entity::PricePoint;
use aurum_core::feed::error::FeedError;
use aurum_core::feed::port::GoldProvider;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// # Summary
/// 国内黄金现货行情提供者，对接 SGE 风格的历史行情 JSON 接口。
///
/// # Invariants
/// - 上游日期参数使用紧凑格式 `YYYYMMDD`。
/// - 响应字段为中文命名，缺失或非数值字段归一化为 `None`（收盘价填 `0.0`）。
pub struct SgeProvider {
    /// 内部使用的 HTTP 客户端
    client: Client,
    /// 接口根地址
    base_url: String,
}

impl SgeProvider {
    /// # Summary
    /// 创建一个新的 SgeProvider 实例。
    ///
    /// # Logic
    /// 1. 配置超时，上游挂起按抓取失败处理。
    /// 2. 设置伪装浏览器 Header (User-Agent) 以减少被拦截风险。
    ///
    /// # Arguments
    /// * `base_url`: 接口根地址。
    /// * `timeout`: 请求超时。
    ///
    /// # Returns
    /// 返回初始化后的 SgeProvider。
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
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
            base_url: base_url.into(),
        }
    }
}

/// # Summary
/// 国内行情接口响应顶层结构。
#[derive(Deserialize, Debug)]
struct SgeResponse {
    // 历史行情行列表，schema 异常时缺失
    data: Option<Vec<SgeRow>>,
}

/// # Summary
/// 国内行情单日数据行，价格字段可能为数值、字符串或缺失。
#[derive(Deserialize, Debug)]
struct SgeRow {
    #[serde(rename = "日期")]
    date: String,
    #[serde(rename = "开盘", default)]
    open: Option<Value>,
    #[serde(rename = "最高", default)]
    high: Option<Value>,
    #[serde(rename = "最低", default)]
    low: Option<Value>,
    #[serde(rename = "收盘", default)]
    close: Option<Value>,
    #[serde(rename = "成交量", default)]
    volume: Option<Value>,
}

/// 将上游的宽松数值（数字或数字字符串）归一化为 f64。
fn loose_f64(v: Option<&Value>) -> Option<f64> {
    match v {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[async_trait]
impl GoldProvider for SgeProvider {
    /// # Summary
    /// 抓取国内黄金现货的日线历史数据。
    ///
    /// # Logic
    /// 1. 将日期边界格式化为 `YYYYMMDD`。
    /// 2. 请求 `/api/gold/history` 并解析 JSON。
    /// 3. 逐行归一化字段：非数值映射为 `None`，收盘价缺失填 `0.0`。
    ///
    /// # Arguments
    /// * `start`: 开始日期。
    /// * `end`: 结束日期（含）。
    ///
    /// # Returns
    /// 成功返回数据点列表（上游为空时为合法的空列表），失败返回 `FeedError`。
    async fn fetch_daily(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PricePoint>, FeedError> {
        let fmt = Market::Domestic.date_format();
        let url = format!("{}/api/gold/history", self.base_url);

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("startDate", start.format(fmt).to_string()),
                ("endDate", end.format(fmt).to_string()),
            ])
            .send()
            .await
            .map_err(|e| FeedError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(FeedError::Network(format!("HTTP {}", resp.status())));
        }

        let json: SgeResponse = resp
            .json()
            .await
            .map_err(|e| FeedError::Parse(e.to_string()))?;

        // data 字段整体缺失属于 schema 异常，区别于合法的空列表
        let rows = json.data.ok_or(FeedError::NotFound)?;

        let mut points = Vec::with_capacity(rows.len());
        for row in rows {
            let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d")
                .map_err(|e| FeedError::Parse(format!("Bad date {}: {}", row.date, e)))?;
            let date = date.and_time(NaiveTime::MIN).and_utc();

            points.push(PricePoint {
                market: Market::Domestic,
                date,
                open: loose_f64(row.open.as_ref()),
                high: loose_f64(row.high.as_ref()),
                low: loose_f64(row.low.as_ref()),
                close: loose_f64(row.close.as_ref()).unwrap_or(0.0),
                volume: loose_f64(row.volume.as_ref()),
            });
        }

        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_loose_f64_normalization() {
        assert_eq!(loose_f64(Some(&json!(482.5))), Some(482.5));
        assert_eq!(loose_f64(Some(&json!("483.10"))), Some(483.1));
        assert_eq!(loose_f64(Some(&json!("--"))), None);
        assert_eq!(loose_f64(Some(&json!(null))), None);
        assert_eq!(loose_f64(None), None);
    }

    #[test]
    fn test_row_field_mapping() {
        let raw = json!({
            "data": [{
                "日期": "2026-03-02",
                "开盘": "481.2",
                "最高": 485.0,
                "最低": null,
                "成交量": "n/a"
            }]
        });
        let parsed: SgeResponse = serde_json::from_value(raw).unwrap();
        let rows = parsed.data.unwrap();
        assert_eq!(loose_f64(rows[0].open.as_ref()), Some(481.2));
        assert_eq!(loose_f64(rows[0].low.as_ref()), None);
        // 收盘价整体缺失 → 调用方填 0.0
        assert_eq!(loose_f64(rows[0].close.as_ref()), None);
        assert_eq!(loose_f64(rows[0].volume.as_ref()), None);
    }
}
