use chrono::{DateTime, Datelike, TimeZone, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// # Summary
/// 黄金市场枚举，区分国内现货与国际市场两条独立的价格序列。
///
/// # Invariants
/// - 每个市场对应一个独立的上游数据源与日期字符串约定。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Market {
    // 国内市场 (上游日期格式: YYYYMMDD, 含周末)
    Domestic,
    // 国际市场 (上游日期格式: YYYY-MM-DD, 跳过周末)
    International,
}

impl Market {
    /// 上游接口的日期字符串格式约定。
    pub fn date_format(&self) -> &'static str {
        match self {
            Market::Domestic => "%Y%m%d",
            Market::International => "%Y-%m-%d",
        }
    }

    /// 模拟数据随机游走的基准起始价。
    pub fn base_price(&self) -> f64 {
        match self {
            Market::Domestic => 450.0,
            Market::International => 1800.0,
        }
    }

    /// 该市场的日历是否包含周末。
    pub fn includes_weekends(&self) -> bool {
        matches!(self, Market::Domestic)
    }

    /// 两个市场的完整列表，用于全量同步与对比查询。
    pub const ALL: [Market; 2] = [Market::Domestic, Market::International];
}

impl FromStr for Market {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "domestic" => Ok(Market::Domestic),
            "international" => Ok(Market::International),
            _ => Err(format!("Unknown market: {}", s)),
        }
    }
}

impl std::fmt::Display for Market {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Market::Domestic => write!(f, "domestic"),
            Market::International => write!(f, "international"),
        }
    }
}

/// # Summary
/// 将任意时间戳归一化到其所在 UTC 自然日的 00:00:00。
///
/// # Logic
/// 1. 提取年月日。
/// 2. 以零点重建时间戳。
///
/// # Arguments
/// * `ts`: 任意时刻。
///
/// # Returns
/// 返回当日零点的 UTC 时间。
pub fn day_floor(ts: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(ts.year(), ts.month(), ts.day(), 0, 0, 0)
        .single()
        .unwrap_or(ts)
}

/// 判断给定日期是否为周六或周日。
pub fn is_weekend(ts: DateTime<Utc>) -> bool {
    matches!(ts.weekday(), Weekday::Sat | Weekday::Sun)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_round_trip() {
        assert_eq!("domestic".parse::<Market>().ok(), Some(Market::Domestic));
        assert_eq!(
            "INTERNATIONAL".parse::<Market>().ok(),
            Some(Market::International)
        );
        assert!("onshore".parse::<Market>().is_err());
        assert_eq!(Market::Domestic.to_string(), "domestic");
    }

    #[test]
    fn test_day_floor() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 5, 13, 45, 12).unwrap();
        let floored = day_floor(ts);
        assert_eq!(floored, Utc.with_ymd_and_hms(2026, 3, 5, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_weekend_detection() {
        // 2026-03-07 是周六
        let sat = Utc.with_ymd_and_hms(2026, 3, 7, 0, 0, 0).unwrap();
        let mon = Utc.with_ymd_and_hms(2026, 3, 9, 0, 0, 0).unwrap();
        assert!(is_weekend(sat));
        assert!(!is_weekend(mon));
    }
}
