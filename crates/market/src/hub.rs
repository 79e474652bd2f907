use crate::feeder::Feeder;
use dashmap::DashMap;
use std::sync::Arc;
use tickview_core::market::entity::{RawSample, SeriesSnapshot};
use tickview_core::market::port::{MarketDataProvider, SeriesSource, SnapshotStream};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

/// # Summary
/// 行情序列中心，`SeriesSource` 的具体实现。
///
/// # Invariants
/// - 每个证券对应一份 `Arc<Vec<RawSample>>`，按时间严格升序。
/// - 已发出的快照永不被修改：写入时若快照仍被外部持有则先复制（copy-on-write）。
/// - 每次序列变化都会向广播通道发送新快照。
pub struct SeriesHub {
    // 每个证券保留的最大采样数，0 表示不限制
    retention: usize,
    // 证券代码到当前序列的映射
    series: DashMap<String, Arc<Vec<RawSample>>>,
    // 快照更新广播
    updates: broadcast::Sender<SeriesSnapshot>,
}

impl SeriesHub {
    /// # Summary
    /// 创建序列中心。
    ///
    /// # Arguments
    /// * `retention`: 每个证券保留的最大采样数，0 表示不限制。
    ///
    /// # Returns
    /// 返回 SeriesHub 的共享指针。
    pub fn new(retention: usize) -> Arc<Self> {
        let (updates, _) = broadcast::channel(256);
        Arc::new(Self {
            retention,
            series: DashMap::new(),
            updates,
        })
    }

    /// # Summary
    /// 用一批历史采样替换某个证券的序列。
    ///
    /// # Logic
    /// 1. 按时间升序排序，去除重复时间戳（保留先出现的一条）。
    /// 2. 超出保留上限时丢弃最旧的数据。
    /// 3. 替换注册表中的序列并广播新快照。
    ///
    /// # Arguments
    /// * `symbol`: 证券代码。
    /// * `samples`: 历史采样，顺序不限。
    ///
    /// # Returns
    /// 实际保留的采样数。
    pub fn load_history(&self, symbol: &str, mut samples: Vec<RawSample>) -> usize {
        samples.sort_by_key(|s| s.timestamp);
        samples.dedup_by_key(|s| s.timestamp);
        self.trim(&mut samples);

        let count = samples.len();
        let samples = Arc::new(samples);
        self.series.insert(symbol.to_string(), Arc::clone(&samples));
        info!("Loaded {} samples for {}", count, symbol);
        self.publish(symbol, samples);
        count
    }

    /// # Summary
    /// 追加一条实时采样。
    ///
    /// # Logic
    /// 1. 若采样不晚于序列最后一条，视为重复或乱序推送直接丢弃。
    /// 2. 否则追加到序列末尾（未跟踪的证券自动开始新序列），并按保留上限裁剪。
    /// 3. 广播新快照。
    ///
    /// # Arguments
    /// * `symbol`: 证券代码。
    /// * `sample`: 新采样。
    ///
    /// # Returns
    /// 采样被接受时返回 true。
    pub fn append(&self, symbol: &str, sample: RawSample) -> bool {
        let samples = {
            let mut entry = self.series.entry(symbol.to_string()).or_default();
            if let Some(last) = entry.last()
                && sample.timestamp <= last.timestamp
            {
                trace!(
                    "Dropped stale sample for {} at {} (last {})",
                    symbol, sample.timestamp, last.timestamp
                );
                return false;
            }
            let samples = Arc::make_mut(entry.value_mut());
            samples.push(sample);
            self.trim(samples);
            Arc::clone(entry.value())
        };
        self.publish(symbol, samples);
        true
    }

    /// 停止跟踪某个证券，返回其是否存在
    pub fn remove(&self, symbol: &str) -> bool {
        let removed = self.series.remove(symbol).is_some();
        if removed {
            debug!("Stopped tracking {}", symbol);
        }
        removed
    }

    /// # Summary
    /// 启动后台行情抓取任务。
    ///
    /// # Logic
    /// 1. 以弱引用持有本中心，中心被释放后任务自动结束。
    /// 2. 先回补历史，再持续转发实时流。
    ///
    /// # Arguments
    /// * `provider`: 行情数据源。
    /// * `symbols`: 跟踪的证券代码，为空时跟踪数据源提供的全部代码。
    ///
    /// # Returns
    /// 后台任务句柄。
    pub fn spawn_feed(
        self: &Arc<Self>,
        provider: Arc<dyn MarketDataProvider>,
        symbols: Vec<String>,
    ) -> JoinHandle<()> {
        let feeder = Feeder::new(Arc::downgrade(self), provider, symbols);
        tokio::spawn(feeder.run())
    }

    fn trim(&self, samples: &mut Vec<RawSample>) {
        if self.retention > 0 && samples.len() > self.retention {
            let excess = samples.len() - self.retention;
            samples.drain(..excess);
        }
    }

    fn publish(&self, symbol: &str, samples: Arc<Vec<RawSample>>) {
        let snapshot = SeriesSnapshot {
            symbol: symbol.to_string(),
            samples,
        };
        if self.updates.send(snapshot).is_err() {
            trace!("No subscribers for {} update", symbol);
        }
    }
}

impl SeriesSource for SeriesHub {
    fn snapshot(&self, symbol: &str) -> Option<SeriesSnapshot> {
        self.series.get(symbol).map(|samples| SeriesSnapshot {
            symbol: symbol.to_string(),
            samples: Arc::clone(samples.value()),
        })
    }

    fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.series.iter().map(|e| e.key().clone()).collect();
        symbols.sort();
        symbols
    }

    /// # Summary
    /// 订阅快照更新流。
    ///
    /// # Logic
    /// 挂载到广播通道；订阅者消费过慢被跳过的消息只记录告警，后续快照仍包含完整数据。
    fn subscribe(&self) -> SnapshotStream {
        let mut rx = self.updates.subscribe();
        let stream = async_stream::stream! {
            loop {
                match rx.recv().await {
                    Ok(snapshot) => yield snapshot,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Snapshot subscriber lagged, skipped {} updates", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        };
        Box::pin(stream)
    }
}
