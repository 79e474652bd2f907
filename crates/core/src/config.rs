use crate::chart::entity::{BoundaryMode, ChartSpec};
use crate::common::MILLIS_PER_MINUTE;
use crate::portfolio::entity::Holding;
use serde::{Deserialize, Serialize};

/// 全局应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub market: MarketConfig,
    pub chart: ChartConfig,
    pub portfolio: PortfolioConfig,
    pub log: LogConfig,
}

/// 行情源与序列存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    // 原始采样频率（毫秒）
    pub cadence_ms: u64,
    // 每个证券保留的最大采样数，0 表示不限制
    pub retention: usize,
    // 行情回放文件路径
    pub replay_path: String,
    // 回放实时消息的间隔（毫秒）
    pub replay_pace_ms: u64,
    // 初始自选列表，为空时跟踪数据源提供的全部代码
    pub symbols: Vec<String>,
}

/// 图表配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub boundary: BoundaryMode,
    pub widgets: Vec<ChartSpec>,
}

/// 投资组合配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioConfig {
    pub holdings: Vec<Holding>,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    // 默认日志级别，可被 RUST_LOG 覆盖
    pub level: String,
    // 滚动日志目录，为空时只输出到标准输出
    pub dir: Option<String>,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            cadence_ms: MILLIS_PER_MINUTE,
            // 30 天的分钟数据
            retention: 30 * 24 * 60,
            replay_path: "data/replay.json".to_string(),
            replay_pace_ms: 1_000,
            symbols: Vec::new(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: None,
        }
    }
}
