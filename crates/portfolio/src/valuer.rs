use rust_decimal::Decimal;
use tickview_core::common::MILLIS_PER_DAY;
use tickview_core::market::entity::RawSample;
use tickview_core::market::port::SeriesSource;
use tickview_core::portfolio::entity::{Holding, HoldingValuation, PortfolioValuation};
use tickview_core::portfolio::error::PortfolioError;
use tracing::{debug, warn};

/// # Summary
/// 持仓估值器。
///
/// # Invariants
/// - `lookback` 为一天对应的采样条数，用于定位 24 小时前的价格。
#[derive(Debug, Clone, Copy)]
pub struct PortfolioValuer {
    lookback: usize,
}

impl PortfolioValuer {
    /// # Summary
    /// 按采样频率创建估值器。
    ///
    /// # Arguments
    /// * `cadence_ms`: 原始采样间隔（毫秒）。
    ///
    /// # Returns
    /// 频率为 0 时返回 `PortfolioError::InvalidCadence`。
    pub fn new(cadence_ms: u64) -> Result<Self, PortfolioError> {
        if cadence_ms == 0 {
            return Err(PortfolioError::InvalidCadence(cadence_ms));
        }
        let lookback = usize::try_from(MILLIS_PER_DAY / cadence_ms)
            .map_err(|_| PortfolioError::InvalidCadence(cadence_ms))?;
        Ok(Self { lookback })
    }

    /// # Summary
    /// 计算整个组合的估值。
    ///
    /// # Logic
    /// 1. 逐个头寸读取快照；没有数据的代码记入 `missing` 并跳过。
    /// 2. 当前价取最新收盘价，前值取一天前的收盘价，历史不足一天时取最早一条。
    /// 3. 汇总市值与盈亏，前值合计为 0 时涨跌幅记为 0。
    ///
    /// # Arguments
    /// * `holdings`: 持仓列表。
    /// * `source`: 行情序列源。
    ///
    /// # Returns
    /// 价格无法表示为十进制数时返回 `PortfolioError::InvalidPrice`。
    pub fn value(
        &self,
        holdings: &[Holding],
        source: &dyn SeriesSource,
    ) -> Result<PortfolioValuation, PortfolioError> {
        let mut valuation = PortfolioValuation::default();

        for holding in holdings {
            let snapshot = source.snapshot(&holding.symbol);
            let samples = snapshot.as_ref().map(|s| s.as_slice()).unwrap_or_default();
            let previous_index = samples.len().saturating_sub(1).saturating_sub(self.lookback);
            let (Some(current), Some(previous)) = (samples.last(), samples.get(previous_index))
            else {
                warn!("No market data for holding {}", holding.symbol);
                valuation.missing.push(holding.symbol.clone());
                continue;
            };

            let detail = value_holding(holding, current, previous)?;
            valuation.total_current_value += detail.current_value;
            valuation.total_previous_value += detail.previous_value;
            valuation.holdings.push(detail);
        }

        valuation.total_gain_loss = valuation.total_current_value - valuation.total_previous_value;
        valuation.total_percent_change =
            ratio(valuation.total_gain_loss, valuation.total_previous_value);
        debug!(
            "Valued {} holdings, total {} ({} missing)",
            valuation.holdings.len(),
            valuation.total_current_value,
            valuation.missing.len()
        );
        Ok(valuation)
    }
}

fn value_holding(
    holding: &Holding,
    current: &RawSample,
    previous: &RawSample,
) -> Result<HoldingValuation, PortfolioError> {
    let current_price = to_decimal(&holding.symbol, current.close)?;
    let previous_price = to_decimal(&holding.symbol, previous.close)?;
    let current_value = current_price * holding.units;
    let previous_value = previous_price * holding.units;

    Ok(HoldingValuation {
        symbol: holding.symbol.clone(),
        units: holding.units,
        current_price,
        current_value,
        previous_price,
        previous_value,
        percent_change: ratio(current_price - previous_price, previous_price),
        gain_loss: current_value - previous_value,
    })
}

fn to_decimal(symbol: &str, price: f64) -> Result<Decimal, PortfolioError> {
    Decimal::try_from(price).map_err(|_| PortfolioError::InvalidPrice {
        symbol: symbol.to_string(),
        price,
    })
}

// 分母为 0 时返回 0
fn ratio(delta: Decimal, base: Decimal) -> Decimal {
    delta.checked_div(base).unwrap_or(Decimal::ZERO)
}
