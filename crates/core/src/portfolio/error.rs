use thiserror::Error;

/// # Summary
/// 组合估值域错误枚举。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PortfolioError {
    /// 价格无法转换为十进制数（NaN 或无穷大）
    #[error("Invalid price {price} for symbol {symbol}")]
    InvalidPrice { symbol: String, price: f64 },
    /// 采样频率为 0
    #[error("Invalid cadence: {0}ms")]
    InvalidCadence(u64),
}
