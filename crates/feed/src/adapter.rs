use crate::synthetic::SyntheticGenerator;
use aurum_core::common::Market;
use aurum_core::feed::entity::FetchOutcome;
use aurum_core::feed::port::GoldProvider;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::warn;

/// # Summary
/// 行情统一入口适配器：按市场路由到对应上游，失败时降级为模拟数据。
///
/// # Invariants
/// - `fetch` 永远不返回错误：一切上游失败被吸收为 `FetchOutcome::Degraded`。
/// - 降级使用的随机源默认取系统熵；指定种子后降级序列完全可复现。
pub struct GoldFeed {
    // 国内行情上游
    domestic: Arc<dyn GoldProvider>,
    // 国际行情上游
    international: Arc<dyn GoldProvider>,
    // 降级随机源种子（测试用）
    seed: Option<u64>,
}

impl GoldFeed {
    /// # Summary
    /// 创建 GoldFeed 适配器。
    ///
    /// # Arguments
    /// * `domestic` - 国内市场上游实现。
    /// * `international` - 国际市场上游实现。
    ///
    /// # Returns
    /// 返回适配器实例（降级随机源为系统熵）。
    pub fn new(domestic: Arc<dyn GoldProvider>, international: Arc<dyn GoldProvider>) -> Self {
        Self {
            domestic,
            international,
            seed: None,
        }
    }

    /// 固定降级随机源的种子，使模拟序列可复现。
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn provider(&self, market: Market) -> &Arc<dyn GoldProvider> {
        match market {
            Market::Domestic => &self.domestic,
            Market::International => &self.international,
        }
    }

    /// # Summary
    /// 抓取指定市场在闭区间内的日线数据，失败时静默降级。
    ///
    /// # Logic
    /// 1. 路由到该市场的上游实现并抓取。
    /// 2. 成功则返回 `Live`（上游为空时为合法的空结果）。
    /// 3. 任何失败（网络 / 解析 / schema 异常 / 超时）记录 warn 日志，
    ///    为同一区间生成模拟数据并返回 `Degraded` 附带失败原因。
    ///
    /// # Arguments
    /// * `market`: 市场类型。
    /// * `start`: 开始日期。
    /// * `end`: 结束日期（含）。
    ///
    /// # Returns
    /// 返回带来源标签的抓取结果，永不失败。
    pub async fn fetch(
        &self,
        market: Market,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> FetchOutcome {
        match self.provider(market).fetch_daily(start, end).await {
            Ok(points) => FetchOutcome::Live(points),
            Err(e) => {
                warn!("抓取 {} 行情失败: {}, 降级为模拟数据", market, e);

                let points = match self.seed {
                    Some(seed) => {
                        let mut rng = SyntheticGenerator::seeded_rng(seed);
                        SyntheticGenerator::generate(&mut rng, market, start, end)
                    }
                    None => {
                        let mut rng = SyntheticGenerator::entropy_rng();
                        SyntheticGenerator::generate(&mut rng, market, start, end)
                    }
                };

                FetchOutcome::Degraded {
                    points,
                    reason: e.to_string(),
                }
            }
        }
    }
}
