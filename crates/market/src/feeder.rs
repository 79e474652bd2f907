use crate::hub::SeriesHub;
use futures::StreamExt;
use std::sync::{Arc, Weak};
use tickview_core::market::error::MarketError;
use tickview_core::market::port::MarketDataProvider;
use tracing::{info, warn};

/// # Summary
/// 行情抓取任务后台逻辑执行器。
///
/// # Invariants
/// - 只持有序列中心的弱引用，不阻止其释放。
pub struct Feeder {
    hub: Weak<SeriesHub>,
    provider: Arc<dyn MarketDataProvider>,
    symbols: Vec<String>,
}

impl Feeder {
    pub fn new(
        hub: Weak<SeriesHub>,
        provider: Arc<dyn MarketDataProvider>,
        symbols: Vec<String>,
    ) -> Self {
        Self {
            hub,
            provider,
            symbols,
        }
    }

    /// # Summary
    /// 执行抓取流程。
    ///
    /// # Logic
    /// 1. 确定跟踪的代码列表（为空时向数据源查询）。
    /// 2. 回补历史并写入中心；回补失败只记录告警，继续订阅实时流。
    /// 3. 逐条转发实时采样，直到流结束或中心被释放。
    pub async fn run(self) {
        let symbols = match self.resolve_symbols().await {
            Ok(symbols) => symbols,
            Err(e) => {
                warn!("Feeder could not list symbols: {}", e);
                return;
            }
        };
        info!("Feeder started for {:?}", symbols);

        match self.provider.fetch_history(&symbols).await {
            Ok(histories) => {
                let Some(hub) = self.hub.upgrade() else {
                    return;
                };
                for history in histories {
                    hub.load_history(&history.symbol, history.samples);
                }
            }
            Err(e) => warn!("History fetch failed for {:?}: {}", symbols, e),
        }

        let mut stream = match self.provider.subscribe_live(&symbols).await {
            Ok(stream) => stream,
            Err(e) => {
                warn!("Live subscription failed for {:?}: {}", symbols, e);
                return;
            }
        };

        while let Some(live) = stream.next().await {
            match self.hub.upgrade() {
                Some(hub) => {
                    hub.append(&live.symbol, live.sample);
                }
                None => break,
            }
        }
        info!("Feeder for {:?} stopped", symbols);
    }

    async fn resolve_symbols(&self) -> Result<Vec<String>, MarketError> {
        if self.symbols.is_empty() {
            self.provider.list_symbols().await
        } else {
            Ok(self.symbols.clone())
        }
    }
}
