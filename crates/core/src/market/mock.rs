//! 测试替身：内存行情源、静态序列源与合成采样生成器。

use crate::market::entity::{LiveSample, RawSample, SeriesSnapshot, SymbolHistory};
use crate::market::error::MarketError;
use crate::market::port::{MarketDataProvider, SampleStream, SeriesSource, SnapshotStream};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// # Summary
/// 生成确定性的合成行情序列。
///
/// # Logic
/// 1. 从 100.0 开始，以 7 根为周期做涨跌漂移。
/// 2. 每 13 根放大一次影线，使区间内的高低点不总是落在首尾。
///
/// # Arguments
/// * `start`: 第一条采样的时间。
/// * `count`: 采样数量。
/// * `cadence_ms`: 采样间隔。
///
/// # Returns
/// 升序且等间隔的采样列表，每条均满足 `low <= open, close <= high`。
pub fn synthetic_series(start: DateTime<Utc>, count: usize, cadence_ms: u64) -> Vec<RawSample> {
    let step = chrono::Duration::milliseconds(i64::try_from(cadence_ms).unwrap_or(i64::MAX));
    let mut samples = Vec::with_capacity(count);
    let mut timestamp = start;
    let mut open = 100.0_f64;
    for i in 0..count {
        let drift = match i % 7 {
            0..=2 => 0.75,
            3 => -1.5,
            _ => 0.25,
        };
        let wick = if i % 13 == 0 { 2.0 } else { 0.4 };
        let close = open + drift;
        samples.push(RawSample {
            timestamp,
            open,
            high: open.max(close) + wick,
            low: open.min(close) - wick,
            close,
        });
        open = close;
        timestamp += step;
    }
    samples
}

/// # Summary
/// 基于 HashMap 的静态序列源，快照在构造后不再变化。
#[derive(Default)]
pub struct StaticSource {
    series: HashMap<String, SeriesSnapshot>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册一条序列
    pub fn with_series(mut self, symbol: &str, samples: Vec<RawSample>) -> Self {
        self.series
            .insert(symbol.to_string(), SeriesSnapshot::new(symbol, samples));
        self
    }
}

impl SeriesSource for StaticSource {
    fn snapshot(&self, symbol: &str) -> Option<SeriesSnapshot> {
        self.series.get(symbol).cloned()
    }

    fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.series.keys().cloned().collect();
        symbols.sort();
        symbols
    }

    fn subscribe(&self) -> SnapshotStream {
        Box::pin(futures::stream::empty())
    }
}

/// # Summary
/// 内存行情源，历史与实时数据均预先给定。
#[derive(Default, Clone)]
pub struct MockProvider {
    pub histories: Vec<SymbolHistory>,
    pub live: Vec<LiveSample>,
}

#[async_trait]
impl MarketDataProvider for MockProvider {
    async fn list_symbols(&self) -> Result<Vec<String>, MarketError> {
        Ok(self.histories.iter().map(|h| h.symbol.clone()).collect())
    }

    async fn fetch_history(&self, symbols: &[String]) -> Result<Vec<SymbolHistory>, MarketError> {
        Ok(self
            .histories
            .iter()
            .filter(|h| symbols.contains(&h.symbol))
            .cloned()
            .collect())
    }

    async fn subscribe_live(&self, symbols: &[String]) -> Result<SampleStream, MarketError> {
        let live: Vec<LiveSample> = self
            .live
            .iter()
            .filter(|l| symbols.contains(&l.symbol))
            .cloned()
            .collect();
        Ok(Box::pin(futures::stream::iter(live)))
    }
}
