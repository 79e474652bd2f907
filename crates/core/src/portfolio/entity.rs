use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// # Summary
/// 用户持有的单个证券头寸。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holding {
    // 资产标的
    pub symbol: String,
    // 持有股数
    pub units: Decimal,
}

/// # Summary
/// 单个头寸的估值明细。
///
/// # Invariants
/// - `previous_*` 取自 24 小时前的采样（历史不足时取最早一条）。
/// - `percent_change` 为比例值，0.05 表示上涨 5%。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingValuation {
    pub symbol: String,
    pub units: Decimal,
    // 最新收盘价
    pub current_price: Decimal,
    // 当前市值
    pub current_value: Decimal,
    // 24 小时前收盘价
    pub previous_price: Decimal,
    // 24 小时前市值
    pub previous_value: Decimal,
    // 今日涨跌幅
    pub percent_change: Decimal,
    // 盈亏金额
    pub gain_loss: Decimal,
}

/// # Summary
/// 投资组合整体估值。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PortfolioValuation {
    // 各头寸明细，顺序与输入一致
    pub holdings: Vec<HoldingValuation>,
    // 没有行情数据而被跳过的代码
    pub missing: Vec<String>,
    pub total_current_value: Decimal,
    pub total_previous_value: Decimal,
    pub total_gain_loss: Decimal,
    // 组合整体涨跌幅，前值为 0 时为 0
    pub total_percent_change: Decimal,
}
