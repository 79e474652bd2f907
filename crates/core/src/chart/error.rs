use chrono::{DateTime, Utc};
use thiserror::Error;

/// # Summary
/// 重采样域错误枚举。
///
/// # Invariants
/// - 窗口越界不属于错误，由索引钳制静默处理。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResampleError {
    // 证券未被跟踪或尚无任何采样
    #[error("No data for symbol: {0}")]
    NoData(String),
    // 传入的切片为空
    #[error("Empty series")]
    EmptySeries,
    // 周期不是采样频率的正整数倍，或采样频率为 0
    #[error("Invalid bucket interval {interval_ms}ms for cadence {cadence_ms}ms")]
    Configuration { interval_ms: u64, cadence_ms: u64 },
    // 固定窗口需要的本地零点采样不存在
    #[error("No sample at local midnight {0}")]
    MidnightAnchorMissing(DateTime<Utc>),
    // 本地时间无法表示（时区跳变）
    #[error("Local time error: {0}")]
    LocalTime(String),
}
