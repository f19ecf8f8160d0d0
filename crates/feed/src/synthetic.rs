use aurum_core::common::{Market, day_floor, is_weekend};
use aurum_core::feed::entity::PricePoint;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

// 日收益率波动 (±2%)
const DAILY_SIGMA: f64 = 0.02;
// 盘中噪声波动 (±1%)
const INTRADAY_SIGMA: f64 = 0.01;

/// # Summary
/// 模拟数据生成器，在上游不可用时产出随机游走的 OHLCV 日线序列。
///
/// # Invariants
/// - 随机源由调用方注入：同一种子在同一区间必然产出相同序列。
/// - 国际市场跳过周六与周日，国内市场覆盖每个自然日。
/// - 价格保留两位小数，成交量为 [1000, 10000) 的整数。
pub struct SyntheticGenerator;

impl SyntheticGenerator {
    /// 创建固定种子的随机源，用于可复现的测试场景。
    pub fn seeded_rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    /// 创建系统熵随机源，用于线上降级路径。
    pub fn entropy_rng() -> StdRng {
        StdRng::from_entropy()
    }

    /// # Summary
    /// 生成闭区间 `[start, end]` 内的模拟日线序列。
    ///
    /// # Logic
    /// 1. 以市场基准价为起点维护 `base_price`。
    /// 2. 每个纳入日历的自然日：`base *= 1 + N(0, 0.02)` 作为当日收盘价；
    ///    开盘价为收盘价叠加独立的 `N(0, 0.01)` 噪声；
    ///    最高/最低价在开收盘两端按 `|N(0, 0.01)|` 外扩。
    /// 3. 国际市场跳过周末后继续游走（跳过日不消耗随机数）。
    ///
    /// # Arguments
    /// * `rng`: 注入的随机源。
    /// * `market`: 市场类型。
    /// * `start`: 开始日期。
    /// * `end`: 结束日期（含）。
    ///
    /// # Returns
    /// 返回按日期升序的数据点列表。
    pub fn generate<R: Rng>(
        rng: &mut R,
        market: Market,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<PricePoint> {
        let daily = Normal::new(0.0, DAILY_SIGMA).expect("sigma is a positive constant");
        let intraday = Normal::new(0.0, INTRADAY_SIGMA).expect("sigma is a positive constant");

        let mut base_price = market.base_price();
        let mut points = Vec::new();
        let mut current = day_floor(start);
        let end = day_floor(end);

        while current <= end {
            if !market.includes_weekends() && is_weekend(current) {
                current += Duration::days(1);
                continue;
            }

            base_price *= 1.0 + daily.sample(rng);
            let open = base_price * (1.0 + intraday.sample(rng));
            let high = open.max(base_price) * (1.0 + intraday.sample(rng).abs());
            let low = open.min(base_price) * (1.0 - intraday.sample(rng).abs());

            points.push(PricePoint {
                market,
                date: current,
                open: Some(round2(open)),
                high: Some(round2(high)),
                low: Some(round2(low)),
                close: round2(base_price),
                volume: Some(f64::from(rng.gen_range(1000u32..10000))),
            });

            current += Duration::days(1);
        }

        points
    }
}

/// 保留两位小数。
fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurum_core::common::is_weekend;
    use chrono::TimeZone;

    fn range() -> (DateTime<Utc>, DateTime<Utc>) {
        // 2026-03-02 (周一) 到 2026-03-15 (周日)，横跨两个完整周末
        (
            Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 15, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_international_skips_weekends() {
        let (start, end) = range();
        let mut rng = SyntheticGenerator::seeded_rng(7);
        let points = SyntheticGenerator::generate(&mut rng, Market::International, start, end);

        // 14 个自然日中有 4 天周末
        assert_eq!(points.len(), 10);
        assert!(points.iter().all(|p| !is_weekend(p.date)));
    }

    #[test]
    fn test_domestic_covers_every_day() {
        let (start, end) = range();
        let mut rng = SyntheticGenerator::seeded_rng(7);
        let points = SyntheticGenerator::generate(&mut rng, Market::Domestic, start, end);

        assert_eq!(points.len(), 14);
        // 相邻两点间隔恰好一天，无空洞
        for pair in points.windows(2) {
            assert_eq!(pair[1].date - pair[0].date, Duration::days(1));
        }
    }

    #[test]
    fn test_seed_reproducibility() {
        let (start, end) = range();
        let mut a = SyntheticGenerator::seeded_rng(42);
        let mut b = SyntheticGenerator::seeded_rng(42);
        let first = SyntheticGenerator::generate(&mut a, Market::Domestic, start, end);
        let second = SyntheticGenerator::generate(&mut b, Market::Domestic, start, end);

        let closes_a: Vec<f64> = first.iter().map(|p| p.close).collect();
        let closes_b: Vec<f64> = second.iter().map(|p| p.close).collect();
        assert_eq!(closes_a, closes_b);
    }

    #[test]
    fn test_point_shape() {
        let (start, end) = range();
        let mut rng = SyntheticGenerator::seeded_rng(3);
        let points = SyntheticGenerator::generate(&mut rng, Market::International, start, end);

        for p in &points {
            let open = p.open.expect("synthetic open is always present");
            let high = p.high.expect("synthetic high is always present");
            let low = p.low.expect("synthetic low is always present");
            let volume = p.volume.expect("synthetic volume is always present");

            assert!(high >= open.min(p.close));
            assert!(low <= open.max(p.close));
            assert!((1000.0..10000.0).contains(&volume));
            // 两位小数
            assert_eq!(p.close, round2(p.close));
            assert_eq!(open, round2(open));
        }
    }

    #[test]
    fn test_single_day_range() {
        let start = Utc.with_ymd_and_hms(2026, 3, 4, 9, 30, 0).unwrap();
        let mut rng = SyntheticGenerator::seeded_rng(1);
        let points = SyntheticGenerator::generate(&mut rng, Market::Domestic, start, start);

        // 时刻归一化到当日零点，且单日区间恰好一条
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].date, day_floor(start));
    }
}
