use crate::common::Market;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// # Summary
/// 单日黄金价格数据点，由上游抓取或模拟生成，尚未落库。
///
/// # Invariants
/// - `date` 必须归一化到 UTC 自然日零点。
/// - `close` 永远有值：上游缺失收盘价时以 `0.0` 填充，其余字段缺失映射为 `None`。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePoint {
    // 所属市场
    pub market: Market,
    // 交易日 (UTC 零点)
    pub date: DateTime<Utc>,
    // 开盘价
    pub open: Option<f64>,
    // 最高价
    pub high: Option<f64>,
    // 最低价
    pub low: Option<f64>,
    // 收盘价
    pub close: f64,
    // 成交量
    pub volume: Option<f64>,
}

/// # Summary
/// 数据抓取的带标签结果，显式区分真实行情与降级后的模拟数据。
///
/// # Invariants
/// - 适配器层吸收一切上游错误：调用方永远拿到本枚举而非 Err。
/// - 上游成功但返回空集时为 `Live(vec![])`，不触发降级。
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    // 来自真实上游的数据
    Live(Vec<PricePoint>),
    // 上游失败后生成的模拟数据，附带失败原因
    Degraded { points: Vec<PricePoint>, reason: String },
}

impl FetchOutcome {
    /// 取出数据点列表，不关心来源标签。
    pub fn into_points(self) -> Vec<PricePoint> {
        match self {
            FetchOutcome::Live(points) => points,
            FetchOutcome::Degraded { points, .. } => points,
        }
    }

    /// 是否为降级产生的模拟数据。
    pub fn is_degraded(&self) -> bool {
        matches!(self, FetchOutcome::Degraded { .. })
    }

    /// 数据点数量。
    pub fn len(&self) -> usize {
        match self {
            FetchOutcome::Live(points) => points.len(),
            FetchOutcome::Degraded { points, .. } => points.len(),
        }
    }

    /// 是否为空结果。
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
