use crate::feed::entity::PricePoint;
use crate::feed::error::FeedError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// # Summary
/// 单一上游行情数据源接口。每个市场对应一个实现。
///
/// # Invariants
/// - 实现者自行负责将时间范围格式化为其上游的日期字符串约定。
/// - `end` 为包含边界（闭区间）。
#[async_trait]
pub trait GoldProvider: Send + Sync {
    /// # Summary
    /// 抓取指定闭区间内的日线价格数据。
    ///
    /// # Logic
    /// 1. 按上游约定格式化日期边界。
    /// 2. 构建并执行网络请求。
    /// 3. 将上游字段名归一化为 `PricePoint`：
    ///    缺失或非数值字段映射为 `None`，收盘价缺失填 `0.0`。
    ///
    /// # Arguments
    /// * `start`: 开始日期。
    /// * `end`: 结束日期（含）。
    ///
    /// # Returns
    /// 成功返回按日期排列的数据点列表（可能为空），失败返回 `FeedError`。
    async fn fetch_daily(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PricePoint>, FeedError>;
}
