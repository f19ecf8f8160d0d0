use async_trait::async_trait;
use aurum_core::common::Market;
use aurum_core::feed::entity::PricePoint;
use aurum_core::feed::error::FeedError;
use aurum_core::feed::port::GoldProvider;
use aurum_core::store::entity::{PriceRecord, SyncMetadata};
use aurum_core::store::error::StoreError;
use aurum_core::store::port::GoldStore;
use aurum_feed::adapter::GoldFeed;
use aurum_service::gold::{GoldPriceService, ServiceError};
use aurum_store::config::set_root_dir;
use aurum_store::gold::SqliteGoldStore;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Arc;
use tempfile::tempdir;

/// 总是失败的上游，驱动适配器走降级路径。
struct FailingProvider;

#[async_trait]
impl GoldProvider for FailingProvider {
    async fn fetch_daily(
        &self,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> Result<Vec<PricePoint>, FeedError> {
        Err(FeedError::Network(String::from("connection refused")))
    }
}

/// 返回固定数据的上游，驱动 Live 路径。
struct StubProvider {
    points: Vec<PricePoint>,
}

#[async_trait]
impl GoldProvider for StubProvider {
    async fn fetch_daily(
        &self,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> Result<Vec<PricePoint>, FeedError> {
        Ok(self.points.clone())
    }
}

/// 写入路径全部失败的存储，读路径正常返回空集。
struct WriteFailingStore;

#[async_trait]
impl GoldStore for WriteFailingStore {
    async fn query(
        &self,
        _market: Market,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> Result<Vec<PriceRecord>, StoreError> {
        Ok(Vec::new())
    }

    async fn upsert_batch(&self, _points: &[PricePoint]) -> Result<u64, StoreError> {
        Err(StoreError::Database(String::from("disk I/O error")))
    }

    async fn upsert_metadata(&self, _market: Market) -> Result<(), StoreError> {
        Err(StoreError::Database(String::from("disk I/O error")))
    }

    async fn list_metadata(&self) -> Result<Vec<SyncMetadata>, StoreError> {
        Ok(Vec::new())
    }
}

fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

fn stub_point(market: Market, date: DateTime<Utc>, close: f64) -> PricePoint {
    PricePoint {
        market,
        date,
        open: Some(close - 1.0),
        high: Some(close + 2.0),
        low: Some(close - 2.0),
        close,
        volume: Some(3000.0),
    }
}

#[tokio::test]
async fn test_gold_service_full_workflow() {
    // 数据根目录进程内只注入一次，全部场景共用同一个存储
    let tmp_dir = tempdir().expect("Failed to create temp dir");
    set_root_dir(tmp_dir.path().to_path_buf());

    let store: Arc<dyn GoldStore> = Arc::new(
        SqliteGoldStore::new()
            .await
            .expect("Failed to create gold store"),
    );

    // 1. 降级同步：上游全部失败，写入的是可复现的模拟数据
    let failing_feed = Arc::new(
        GoldFeed::new(Arc::new(FailingProvider), Arc::new(FailingProvider)).with_seed(7),
    );
    let service = GoldPriceService::new(store.clone(), failing_feed);

    // 2020-03-02 是周一，区间含两个完整工作周 + 一个周末
    let start = day(2020, 3, 2);
    let end = day(2020, 3, 11);

    let report = service.sync(Market::Domestic, start, end).await.unwrap();
    assert!(report.synced);
    assert!(report.degraded);
    assert_eq!(report.saved_count, 10); // 国内市场含周末，每天一条
    assert_eq!(report.data_count, 10);

    // 2. 覆盖率短路：已有 10 条 >= 9 天 * 0.8，第二次不再拉取
    let again = service.sync(Market::Domestic, start, end).await.unwrap();
    assert!(!again.synced);
    assert_eq!(again.saved_count, 0);
    assert_eq!(again.data_count, 10);
    assert!(!again.degraded);

    // 3. 零天区间：阈值为 0，即使本地为空也直接短路
    let single = service
        .sync(Market::Domestic, day(2020, 5, 1), day(2020, 5, 1))
        .await
        .unwrap();
    assert!(!single.synced);
    assert_eq!(single.data_count, 0);

    // 4. 国际市场降级同步：周末被跳过（3/7、3/8 为周六日）
    let intl = service
        .sync(Market::International, start, end)
        .await
        .unwrap();
    assert!(intl.synced);
    assert_eq!(intl.saved_count, 8);

    // 5. 同步元数据覆盖两个市场
    let meta = service.metadata().await.unwrap();
    assert_eq!(meta.len(), 2);
    assert!(meta.iter().all(|m| m.last_update.is_some()));

    // 6. Live 路径：上游正常返回时不降级，原样入库
    let stub_points = vec![
        stub_point(Market::Domestic, day(2020, 9, 1), 480.0),
        stub_point(Market::Domestic, day(2020, 9, 2), 481.5),
    ];
    let live_feed = Arc::new(GoldFeed::new(
        Arc::new(StubProvider {
            points: stub_points,
        }),
        Arc::new(FailingProvider),
    ));
    let live_service = GoldPriceService::new(store.clone(), live_feed);

    let live = live_service
        .sync(Market::Domestic, day(2020, 9, 1), day(2020, 9, 5))
        .await
        .unwrap();
    assert!(live.synced);
    assert!(!live.degraded);
    assert_eq!(live.saved_count, 2);

    // 7. 区间查询不触发同步，升序返回
    let rows = service
        .get_range(Market::Domestic, start, end)
        .await
        .unwrap();
    assert_eq!(rows.len(), 10);
    assert!(rows.windows(2).all(|w| w[0].date < w[1].date));

    // 8. 数据查询的自动同步：空区间先同步一次再返回
    let auto = service
        .get_data(Market::Domestic, day(2020, 6, 1), day(2020, 6, 10))
        .await
        .unwrap();
    assert_eq!(auto.len(), 10);

    // 自动同步后仍为空（零天区间短路）则为 NotFound
    let missing = service
        .get_data(Market::Domestic, day(2020, 7, 1), day(2020, 7, 1))
        .await;
    assert!(matches!(missing, Err(ServiceError::NotFound(_))));

    // 9. 摘要：手工写入近两天的国际市场收盘价 1900 → 1950
    let today = aurum_core::common::day_floor(Utc::now());
    let recent = vec![
        stub_point(Market::International, today - Duration::days(1), 1900.0),
        stub_point(Market::International, today, 1950.0),
    ];
    assert_eq!(store.upsert_batch(&recent).await.unwrap(), 2);

    let summary = service.summary(Market::International).await.unwrap();
    assert_eq!(summary.latest_price, 1950.0);
    assert_eq!(summary.previous_price, Some(1900.0));
    assert_eq!(summary.change, Some(50.0));
    assert_eq!(summary.change_percent, Some(50.0 / 1900.0 * 100.0));

    // 近窗口内无数据的市场 → NotFound
    let no_summary = service.summary(Market::Domestic).await;
    assert!(matches!(no_summary, Err(ServiceError::NotFound(_))));

    // 10. 对比：一侧为空不算错误，计数为 0
    let cmp = service
        .comparison(today - Duration::days(2), today)
        .await
        .unwrap();
    assert_eq!(cmp.international.data_count, 2);
    assert_eq!(cmp.domestic.data_count, 0);
    assert!(cmp.domestic.records.is_empty());

    // 11. 最新价：近 10 天窗口，国内侧暂无数据
    let latest = service.latest().await.unwrap();
    let intl_latest = latest.international.expect("international should have data");
    assert_eq!(intl_latest.price, 1950.0);
    assert!(latest.domestic.is_none());

    // 12. sync_all 覆盖全部市场
    let reports = service.sync_all(day(2020, 10, 1), day(2020, 10, 5)).await.unwrap();
    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(|r| r.synced));
}

#[tokio::test]
async fn test_sync_absorbs_store_write_failures() {
    // 存储写入失败不上抛：按 0 条计入报告，同步流程本身成功
    let feed = Arc::new(
        GoldFeed::new(Arc::new(FailingProvider), Arc::new(FailingProvider)).with_seed(3),
    );
    let service = GoldPriceService::new(Arc::new(WriteFailingStore), feed);

    let report = service
        .sync(Market::Domestic, day(2020, 3, 2), day(2020, 3, 11))
        .await
        .unwrap();

    assert!(report.synced);
    assert!(report.degraded);
    assert_eq!(report.saved_count, 0);
    // 重查走的是同一个只读为空的存储
    assert_eq!(report.data_count, 0);
}
