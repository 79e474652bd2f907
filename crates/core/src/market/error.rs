use thiserror::Error;

/// # Summary
/// 市场数据域错误枚举，处理读取、解析及数据缺失等问题。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
#[derive(Error, Debug)]
pub enum MarketError {
    // 数据源读取失败（文件、套接字等）
    #[error("Io error: {0}")]
    Io(String),
    // 数据解析错误，如 JSON 格式不匹配或价格字符串非法
    #[error("Parse error: {0}")]
    Parse(String),
    // 请求的数据未找到
    #[error("Data not found")]
    NotFound,
}
