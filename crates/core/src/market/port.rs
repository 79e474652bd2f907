use crate::market::entity::{LiveSample, SeriesSnapshot, SymbolHistory};
use crate::market::error::MarketError;
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

/// # Summary
/// 实时采样流别名，使用动态分发的异步流。
pub type SampleStream = Pin<Box<dyn Stream<Item = LiveSample> + Send>>;

/// # Summary
/// 序列快照更新流别名。
pub type SnapshotStream = Pin<Box<dyn Stream<Item = SeriesSnapshot> + Send>>;

/// # Summary
/// 市场行情数据提供者接口（原始数据源）。
///
/// # Invariants
/// - 历史数据按时间升序返回。
/// - 实时流中的采样对同一证券单调递增；乱序数据由下游丢弃。
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// # Summary
    /// 获取数据源可提供的全部证券代码。
    ///
    /// # Returns
    /// 成功返回代码列表。
    async fn list_symbols(&self) -> Result<Vec<String>, MarketError>;

    /// # Summary
    /// 批量获取历史采样。
    ///
    /// # Logic
    /// 1. 按请求的代码过滤数据源。
    /// 2. 将每个证券的采样整理为升序序列。
    ///
    /// # Arguments
    /// * `symbols`: 证券代码列表。
    ///
    /// # Returns
    /// 成功返回每个证券的历史序列；数据源中不存在的代码直接省略。
    async fn fetch_history(&self, symbols: &[String]) -> Result<Vec<SymbolHistory>, MarketError>;

    /// # Summary
    /// 订阅实时采样流。
    ///
    /// # Arguments
    /// * `symbols`: 订阅的证券代码列表。
    ///
    /// # Returns
    /// 成功返回异步流 SampleStream。
    async fn subscribe_live(&self, symbols: &[String]) -> Result<SampleStream, MarketError>;
}

/// # Summary
/// 原始序列的只读访问接口，供重采样与估值使用。
///
/// # Invariants
/// - `snapshot` 返回的数据在调用方持有期间不会被修改。
pub trait SeriesSource: Send + Sync {
    /// 获取指定证券当前的序列快照，未跟踪时返回 None。
    fn snapshot(&self, symbol: &str) -> Option<SeriesSnapshot>;

    /// 当前已跟踪的全部证券代码。
    fn symbols(&self) -> Vec<String>;

    /// # Summary
    /// 订阅快照更新。
    ///
    /// # Returns
    /// 每次某个证券的序列变化时产出其新快照。
    fn subscribe(&self) -> SnapshotStream;
}
