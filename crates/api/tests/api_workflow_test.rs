use async_trait::async_trait;
use aurum_api::server::{AppState, build_router};
use aurum_api::types::{
    ApiResponse, ComparisonResponse, CreateUserRequest, HealthResponse, LatestPricesResponse,
    MetadataResponse, PriceDataResponse, SyncReportResponse, SyncRequest, UpdateUserRequest,
    UserResponse,
};
use aurum_core::feed::entity::PricePoint;
use aurum_core::feed::error::FeedError;
use aurum_core::feed::port::GoldProvider;
use aurum_core::store::port::{GoldStore, UserStore};
use aurum_feed::adapter::GoldFeed;
use aurum_service::gold::GoldPriceService;
use aurum_service::user::UserService;
use aurum_store::gold::SqliteGoldStore;
use aurum_store::user::SqliteUserStore;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use std::sync::Arc;
use tokio::net::TcpListener;

/// 总是失败的上游，所有同步走可复现的降级路径。
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

// 帮助函数：在随机端口启动测试服务器
async fn spawn_test_server() -> (String, tempfile::TempDir) {
    let tmp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    aurum_store::config::set_root_dir(tmp_dir.path().to_path_buf());

    let gold_store: Arc<dyn GoldStore> = Arc::new(SqliteGoldStore::new().await.unwrap());
    let user_store: Arc<dyn UserStore> = Arc::new(SqliteUserStore::new().await.unwrap());

    let feed = Arc::new(
        GoldFeed::new(Arc::new(FailingProvider), Arc::new(FailingProvider)).with_seed(11),
    );

    let state = AppState {
        gold: GoldPriceService::new(gold_store, feed),
        users: UserService::new(user_store),
    };

    let router = build_router(state, &[]);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let addr = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    // 稍微等待服务器启动
    tokio::time::sleep(std::time::Duration::from_millis(300)).await;

    (addr, tmp_dir)
}

#[tokio::test]
async fn test_full_api_workflow() {
    let _ = tracing_subscriber::fmt().with_env_filter("debug").try_init();

    // reqwest 使用 rustls-no-provider，测试进程需要先安装 Crypto Provider
    let _ = rustls::crypto::ring::default_provider().install_default();

    let (base_url, _tmp) = spawn_test_server().await;
    let client = reqwest::Client::new();

    // ============================================
    // Case 1: 健康检查
    // ============================================
    let res = client
        .get(format!("{}/health", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let health: HealthResponse = res.json().await.unwrap();
    assert_eq!(health.status, "ok");

    // ============================================
    // Case 2: 手动同步 (上游失败 → 降级为模拟数据)
    // 2020-03-02 为周一，区间 10 个自然日
    // ============================================
    let res = client
        .post(format!("{}/api/v1/gold/sync", base_url))
        .json(&SyncRequest {
            start_date: Some("2020-03-02".to_string()),
            end_date: Some("2020-03-11".to_string()),
        })
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let sync_data: ApiResponse<Vec<SyncReportResponse>> = res.json().await.unwrap();
    let reports = sync_data.data.unwrap();
    assert_eq!(reports.len(), 2);

    let domestic = reports
        .iter()
        .find(|r| r.market_type == "domestic")
        .expect("domestic report");
    assert!(domestic.synced);
    assert!(domestic.degraded);
    assert_eq!(domestic.saved_count, 10); // 国内市场含周末

    let international = reports
        .iter()
        .find(|r| r.market_type == "international")
        .expect("international report");
    assert_eq!(international.saved_count, 8); // 3/7、3/8 周末被跳过

    // ============================================
    // Case 3: 区间数据查询
    // ============================================
    let res = client
        .get(format!(
            "{}/api/v1/gold/data/domestic?start_date=2020-03-02&end_date=2020-03-11",
            base_url
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let data: ApiResponse<PriceDataResponse> = res.json().await.unwrap();
    let payload = data.data.unwrap();
    assert_eq!(payload.data_count, 10);
    assert_eq!(payload.records[0].date, "2020-03-02");
    assert!(payload.records[0].close > 0.0);

    // ============================================
    // Case 4: 参数校验 (非法市场 / 非法日期 → 400)
    // ============================================
    let res = client
        .get(format!("{}/api/v1/gold/data/galactic", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .get(format!(
            "{}/api/v1/gold/data/domestic?start_date=03-02-2020",
            base_url
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // ============================================
    // Case 5: 零天区间自动同步后仍为空 → 404
    // ============================================
    let res = client
        .get(format!(
            "{}/api/v1/gold/data/international?start_date=2020-07-01&end_date=2020-07-01",
            base_url
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // ============================================
    // Case 6: 市场对比 (两侧独立计数)
    // ============================================
    let res = client
        .get(format!(
            "{}/api/v1/gold/comparison?start_date=2020-03-02&end_date=2020-03-11",
            base_url
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let cmp: ApiResponse<ComparisonResponse> = res.json().await.unwrap();
    let cmp = cmp.data.unwrap();
    assert_eq!(cmp.domestic.data_count, 10);
    assert_eq!(cmp.international.data_count, 8);

    // ============================================
    // Case 7: 同步元数据与最新价快照
    // ============================================
    let res = client
        .get(format!("{}/api/v1/gold/metadata", base_url))
        .send()
        .await
        .unwrap();
    let meta: ApiResponse<Vec<MetadataResponse>> = res.json().await.unwrap();
    assert_eq!(meta.data.unwrap().len(), 2);

    // 数据都在 2020 年，近 10 天窗口两侧均为 null，但请求本身成功
    let res = client
        .get(format!("{}/api/v1/gold/latest", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let latest: ApiResponse<LatestPricesResponse> = res.json().await.unwrap();
    let latest = latest.data.unwrap();
    assert!(latest.domestic.is_none());
    assert!(latest.international.is_none());

    // 近期无数据的摘要 → 404
    let res = client
        .get(format!("{}/api/v1/gold/summary/domestic", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // ============================================
    // Case 8: 用户 CRUD 全流程
    // ============================================
    let res = client
        .post(format!("{}/api/v1/users", base_url))
        .json(&CreateUserRequest {
            username: "trader_01".to_string(),
            email: "trader01@example.com".to_string(),
            full_name: Some("Trader One".to_string()),
            password: "P@ssw0rd!".to_string(),
            is_active: None,
        })
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let created: ApiResponse<UserResponse> = res.json().await.unwrap();
    let created = created.data.unwrap();
    assert!(created.is_active);
    let user_id = created.id;

    // 重复用户名 → 400
    let res = client
        .post(format!("{}/api/v1/users", base_url))
        .json(&CreateUserRequest {
            username: "trader_01".to_string(),
            email: "other@example.com".to_string(),
            full_name: None,
            password: "pwd".to_string(),
            is_active: None,
        })
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // 列表
    let res = client
        .get(format!("{}/api/v1/users", base_url))
        .send()
        .await
        .unwrap();
    let listed: ApiResponse<Vec<UserResponse>> = res.json().await.unwrap();
    assert_eq!(listed.data.unwrap().len(), 1);

    // 部分更新
    let res = client
        .put(format!("{}/api/v1/users/{}", base_url, user_id))
        .json(&UpdateUserRequest {
            email: Some("trader01@new.example.com".to_string()),
            ..Default::default()
        })
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: ApiResponse<UserResponse> = res.json().await.unwrap();
    assert_eq!(updated.data.unwrap().email, "trader01@new.example.com");

    // 删除与缺失访问
    let res = client
        .delete(format!("{}/api/v1/users/{}", base_url, user_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/api/v1/users/{}", base_url, user_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
