use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use aurum_api::server::{AppState, start_server};
use aurum_core::config::AppConfig;
use aurum_feed::adapter::GoldFeed;
use aurum_feed::domestic::SgeProvider;
use aurum_feed::international::YahooGoldProvider;
use aurum_service::gold::GoldPriceService;
use aurum_service::user::UserService;
use aurum_store::gold::SqliteGoldStore;
use aurum_store::user::SqliteUserStore;
use config::{Config, Environment, File};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// 加载应用配置：可选的 `config/aurum.toml` 文件 + `AURUM_` 前缀环境变量。
///
/// 任一来源缺失或解析失败都回落到内置默认值，启动不因配置问题中断。
fn load_config() -> AppConfig {
    let loaded = Config::builder()
        .add_source(File::with_name("config/aurum").required(false))
        .add_source(Environment::with_prefix("AURUM").separator("__"))
        .build()
        .and_then(|c| c.try_deserialize::<AppConfig>());

    match loaded {
        Ok(config) => config,
        Err(e) => {
            warn!("加载配置失败，使用默认配置: {}", e);
            AppConfig::default()
        }
    }
}

/// # Summary
/// 应用启动入口，纯粹的 DI 容器。
/// 负责实例化所有具体实现组件并通过 Arc<dyn Trait> 注入到服务层。
///
/// # Logic
/// 1. 初始化全局日志与 TLS Crypto Provider。
/// 2. 加载配置并注入存储层数据根目录。
/// 3. 实例化基础设施层（Store、上游 Provider）。
/// 4. 构造应用服务层（GoldPriceService、UserService）。
/// 5. 启动 HTTP 服务并阻塞运行。
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 初始化日志 (RUST_LOG 可覆盖级别)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    info!("Aurum Gold Price Service starting...");

    // reqwest 使用 rustls-no-provider，进程级 Crypto Provider 在此统一安装
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        warn!("Crypto provider 已安装，跳过重复初始化");
    }

    // 2. 加载配置并注入数据根目录
    let config = load_config();
    aurum_store::config::set_root_dir(PathBuf::from(&config.database.data_dir));

    // 3. 实例化基础设施层
    let gold_store = Arc::new(SqliteGoldStore::new().await?);
    let user_store = Arc::new(SqliteUserStore::new().await?);

    let timeout = Duration::from_secs(config.feed.timeout_secs);
    let domestic = Arc::new(SgeProvider::new(
        config.feed.domestic_base_url.clone(),
        timeout,
    ));
    let international = Arc::new(YahooGoldProvider::new(timeout));
    let feed = Arc::new(GoldFeed::new(domestic, international));

    // 4. 构造应用服务层（注入 Core Trait 抽象）
    let state = AppState {
        gold: GoldPriceService::new(gold_store, feed),
        users: UserService::new(user_store),
    };

    // 5. 启动 HTTP 服务
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    start_server(state, &bind_addr, &config.server.cors_origins).await?;

    Ok(())
}
