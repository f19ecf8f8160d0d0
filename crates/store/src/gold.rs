use async_trait::async_trait;
use aurum_core::common::Market;
use aurum_core::feed::entity::PricePoint;
use aurum_core::store::entity::{PriceRecord, SyncMetadata};
use aurum_core::store::error::StoreError;
use aurum_core::store::port::GoldStore;
use chrono::{DateTime, Utc};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::fs;
use tracing::{error, warn};

/// 黄金价格数据库文件名
const GOLD_DB: &str = "gold.db";

/// GoldStore 的 SQLite 实现。
///
/// # Summary
/// 在单个 SQLite 数据库 (`gold.db`) 中管理价格记录与同步元数据。
///
/// # Invariants
/// * (market_type, date) 的唯一性由表级 UNIQUE 约束保证。
/// * 数据库结构在存储实例创建时初始化。
pub struct SqliteGoldStore {
    pool: SqlitePool,
}

impl SqliteGoldStore {
    /// 创建新的 SqliteGoldStore 并初始化表结构。
    ///
    /// # Logic
    /// 1. 获取配置的数据根目录并确保其存在。
    /// 2. 配置 SQLite 连接选项，开启 `create_if_missing`。
    /// 3. 连接到数据库并执行 DDL 初始化价格与元数据表。
    ///
    /// # Returns
    /// * `Result<Self, StoreError>` - 存储实例或数据库错误。
    pub async fn new() -> Result<Self, StoreError> {
        let root = crate::config::get_root_dir();
        fs::create_dir_all(&root).map_err(|e| StoreError::InitError(e.to_string()))?;

        let db_path = root.join(GOLD_DB);

        // 使用官方推荐的配置方式，确保自动创建数据库文件
        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(|e| StoreError::InitError(e.to_string()))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS price_records (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                market_type TEXT NOT NULL,
                date DATETIME NOT NULL,
                open REAL,
                high REAL,
                low REAL,
                close REAL NOT NULL,
                volume REAL,
                created_at DATETIME NOT NULL,
                UNIQUE (market_type, date)
            );

            CREATE INDEX IF NOT EXISTS idx_price_market_date
                ON price_records (market_type, date);

            CREATE TABLE IF NOT EXISTS sync_metadata (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                market_type TEXT NOT NULL UNIQUE,
                last_update DATETIME,
                created_at DATETIME NOT NULL
            );
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| StoreError::InitError(e.to_string()))?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl GoldStore for SqliteGoldStore {
    /// # Summary
    /// 查询指定市场在闭区间内的价格记录。
    ///
    /// # Logic
    /// 按时间区间查询 `price_records` 表，日期升序返回。
    ///
    /// # Arguments
    /// * `market` - 市场类型。
    /// * `start` - 开始日期（含）。
    /// * `end` - 结束日期（含）。
    ///
    /// # Returns
    /// * `Result<Vec<PriceRecord>, StoreError>`
    async fn query(
        &self,
        market: Market,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PriceRecord>, StoreError> {
        let rows = sqlx::query_as::<
            _,
            (
                i64,
                String,
                DateTime<Utc>,
                Option<f64>,
                Option<f64>,
                Option<f64>,
                f64,
                Option<f64>,
                DateTime<Utc>,
            ),
        >(
            r#"
            SELECT id, market_type, date, open, high, low, close, volume, created_at
            FROM price_records
            WHERE market_type = ? AND date >= ? AND date <= ?
            ORDER BY date ASC
            "#,
        )
        .bind(market.to_string())
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        rows.into_iter()
            .map(|r| {
                Ok(PriceRecord {
                    id: r.0,
                    market: r.1.parse::<Market>().map_err(StoreError::Database)?,
                    date: r.2,
                    open: r.3,
                    high: r.4,
                    low: r.5,
                    close: r.6,
                    volume: r.7,
                    created_at: r.8,
                })
            })
            .collect()
    }

    /// # Summary
    /// 批量写入价格数据，跳过已存在的 (market, date) 行。
    ///
    /// # Logic
    /// 1. 开启单个事务。
    /// 2. 逐行执行 `INSERT OR IGNORE`：冲突行原子化跳过，不计入插入数。
    /// 3. 单行执行失败记录 warn 日志后继续，不中断整批。
    /// 4. 提交失败时整批回滚，报告 0 条写入而非抛出。
    ///
    /// # Arguments
    /// * `points` - 待写入的数据点。
    ///
    /// # Returns
    /// * `Result<u64, StoreError>` - 实际新插入的行数。
    async fn upsert_batch(&self, points: &[PricePoint]) -> Result<u64, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut inserted = 0u64;
        let now = Utc::now();

        for p in points {
            let res = sqlx::query(
                r#"
                INSERT OR IGNORE INTO price_records
                    (market_type, date, open, high, low, close, volume, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(p.market.to_string())
            .bind(p.date)
            .bind(p.open)
            .bind(p.high)
            .bind(p.low)
            .bind(p.close)
            .bind(p.volume)
            .bind(now)
            .execute(&mut *tx)
            .await;

            match res {
                Ok(r) => inserted += r.rows_affected(),
                Err(e) => {
                    // 单行失败跳过，整批继续
                    warn!("写入 {} {} 失败: {}", p.market, p.date, e);
                }
            }
        }

        if let Err(e) = tx.commit().await {
            // 提交失败整批回滚，调用方不得假设部分成功
            error!("提交价格批量写入事务失败: {}", e);
            return Ok(0);
        }

        Ok(inserted)
    }

    /// # Summary
    /// 将指定市场的同步时间戳更新为当前时间，行不存在则创建。
    ///
    /// # Logic
    /// 执行 `INSERT .. ON CONFLICT(market_type) DO UPDATE`，幂等。
    ///
    /// # Arguments
    /// * `market` - 市场类型。
    ///
    /// # Returns
    /// * `Result<(), StoreError>`
    async fn upsert_metadata(&self, market: Market) -> Result<(), StoreError> {
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO sync_metadata (market_type, last_update, created_at)
            VALUES (?, ?, ?)
            ON CONFLICT(market_type) DO UPDATE SET last_update = excluded.last_update
            "#,
        )
        .bind(market.to_string())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(())
    }

    /// # Summary
    /// 列出全部市场的同步元数据。
    ///
    /// # Returns
    /// * `Result<Vec<SyncMetadata>, StoreError>`
    async fn list_metadata(&self) -> Result<Vec<SyncMetadata>, StoreError> {
        let rows = sqlx::query_as::<_, (String, Option<DateTime<Utc>>)>(
            "SELECT market_type, last_update FROM sync_metadata ORDER BY market_type",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        rows.into_iter()
            .map(|r| {
                Ok(SyncMetadata {
                    market: r.0.parse::<Market>().map_err(StoreError::Database)?,
                    last_update: r.1,
                })
            })
            .collect()
    }
}
