use aurum_core::feed::port::GoldProvider;
use aurum_feed::international::YahooGoldProvider;
use chrono::{Duration as ChronoDuration, Utc};
use std::time::Duration;

/// # Summary
/// 雅虎财经 GLD 行情获取的集成测试（依赖外网，默认跳过）。
///
/// # Logic
/// 1. 初始化 YahooGoldProvider。
/// 2. 抓取过去 14 天的日线数据。
/// 3. 断言数据非空且收盘价为正。
#[tokio::test]
#[ignore = "requires network access to query1.finance.yahoo.com"]
async fn test_yahoo_real_fetch() {
    let _ = rustls::crypto::ring::default_provider().install_default();

    let provider = YahooGoldProvider::new(Duration::from_secs(10));
    let end = Utc::now();
    let start = end - ChronoDuration::days(14);

    let result = provider.fetch_daily(start, end).await;

    assert!(
        result.is_ok(),
        "Failed to fetch real data from Yahoo: {:?}",
        result.err()
    );
    let points = result.unwrap();
    assert!(!points.is_empty(), "Points list should not be empty");

    println!("Successfully fetched {} GLD points", points.len());
    for p in points.iter() {
        println!("{:?}: Close = {}", p.date, p.close);
        assert!(p.close > 0.0);
    }
}
