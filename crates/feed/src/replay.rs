use crate::payload::{ServerMessage, decode_all};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tickview_core::market::entity::{LiveSample, SymbolHistory};
use tickview_core::market::error::MarketError;
use tickview_core::market::port::{MarketDataProvider, SampleStream};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, warn};

/// # Summary
/// 基于录制文件的行情回放数据源。
///
/// # Invariants
/// - 文件内容是一个 `ServerMessage` 的 JSON 数组，打开时整体解码并缓存。
/// - 实时消息按录制顺序、以固定节奏推送。
#[derive(Clone)]
pub struct ReplayProvider {
    messages: Arc<Vec<ServerMessage>>,
    // 两条实时消息之间的间隔
    pace: Duration,
}

impl ReplayProvider {
    /// # Summary
    /// 读取并解码回放文件。
    ///
    /// # Arguments
    /// * `path`: 回放文件路径。
    /// * `pace`: 实时消息的推送间隔，零表示不等待。
    ///
    /// # Returns
    /// 读取失败返回 `MarketError::Io`，格式错误返回 `MarketError::Parse`。
    pub async fn open(path: impl AsRef<Path>, pace: Duration) -> Result<Self, MarketError> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| MarketError::Io(format!("{}: {}", path.display(), e)))?;
        let messages = decode_all(&text)?;
        info!(
            "Loaded {} replay messages from {}",
            messages.len(),
            path.display()
        );
        Ok(Self::from_messages(messages, pace))
    }

    pub fn from_messages(messages: Vec<ServerMessage>, pace: Duration) -> Self {
        Self {
            messages: Arc::new(messages),
            pace,
        }
    }

    fn live_samples(&self, symbols: &[String]) -> Vec<LiveSample> {
        self.messages
            .iter()
            .filter_map(|message| match message {
                ServerMessage::Live { new_value } if symbols.contains(&new_value.symbol) => {
                    Some(new_value.clone())
                }
                _ => None,
            })
            .filter_map(|series| match series.into_live() {
                Ok(live) => Some(live),
                Err(e) => {
                    warn!("Skipped malformed live message: {}", e);
                    None
                }
            })
            .collect()
    }
}

#[async_trait]
impl MarketDataProvider for ReplayProvider {
    /// # Summary
    /// 返回录制中的证券代码。
    ///
    /// # Logic
    /// 优先使用 `list` 消息；没有时取所有历史与实时消息中出现过的代码。
    async fn list_symbols(&self) -> Result<Vec<String>, MarketError> {
        if let Some(symbols) = self.messages.iter().find_map(|m| match m {
            ServerMessage::List { symbols } => Some(symbols.clone()),
            _ => None,
        }) {
            return Ok(symbols);
        }

        let mut symbols: Vec<String> = self
            .messages
            .iter()
            .flat_map(|m| match m {
                ServerMessage::Historical { data } => {
                    data.iter().map(|s| s.symbol.clone()).collect::<Vec<_>>()
                }
                ServerMessage::Live { new_value } => vec![new_value.symbol.clone()],
                ServerMessage::List { .. } => Vec::new(),
            })
            .collect();
        symbols.sort();
        symbols.dedup();
        Ok(symbols)
    }

    /// # Summary
    /// 汇总录制中请求证券的历史数据。
    ///
    /// # Logic
    /// 同一证券出现在多条历史消息中时，以最后一条为准。
    async fn fetch_history(&self, symbols: &[String]) -> Result<Vec<SymbolHistory>, MarketError> {
        let mut histories: Vec<SymbolHistory> = Vec::new();
        for message in self.messages.iter() {
            let ServerMessage::Historical { data } = message else {
                continue;
            };
            for series in data.iter().filter(|s| symbols.contains(&s.symbol)) {
                let history = series.clone().into_history()?;
                histories.retain(|h| h.symbol != history.symbol);
                histories.push(history);
            }
        }
        debug!("Replay history for {} symbols", histories.len());
        Ok(histories)
    }

    /// # Summary
    /// 订阅实时回放流。
    ///
    /// # Logic
    /// 1. 创建异步通道 (mpsc)。
    /// 2. 后台任务按节奏逐条发送，接收端关闭时提前结束。
    /// 3. 录制播放完毕后关闭通道，流随之结束。
    async fn subscribe_live(&self, symbols: &[String]) -> Result<SampleStream, MarketError> {
        let samples = self.live_samples(symbols);
        let pace = self.pace;
        let (tx, rx) = tokio::sync::mpsc::channel(100);

        tokio::spawn(async move {
            let total = samples.len();
            for sample in samples {
                if !pace.is_zero() {
                    tokio::time::sleep(pace).await;
                }
                if tx.send(sample).await.is_err() {
                    debug!("Replay receiver dropped");
                    return;
                }
            }
            info!("Replay finished after {} live messages", total);
        });

        Ok(Box::pin(ReceiverStream::new(rx)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{WirePoint, WirePrice, WireSeries};
    use chrono::{Duration as ChronoDuration, TimeZone, Utc};

    fn point(minute: u32, price: &str) -> WirePoint {
        WirePoint {
            timestamp: Utc.with_ymd_and_hms(2026, 3, 2, 15, minute, 0).unwrap(),
            open: WirePrice::Text(price.to_string()),
            high: WirePrice::Text(price.to_string()),
            low: WirePrice::Text(price.to_string()),
            close: WirePrice::Text(price.to_string()),
        }
    }

    fn historical(symbol: &str, points: Vec<WirePoint>) -> ServerMessage {
        ServerMessage::Historical {
            data: vec![WireSeries {
                symbol: symbol.to_string(),
                data: points,
            }],
        }
    }

    #[tokio::test]
    async fn test_list_symbols_falls_back_to_seen_symbols() {
        let provider = ReplayProvider::from_messages(
            vec![
                historical("MSFT", vec![point(0, "1")]),
                historical("AAPL", vec![point(0, "1")]),
            ],
            Duration::ZERO,
        );
        assert_eq!(
            provider.list_symbols().await.unwrap(),
            vec!["AAPL".to_string(), "MSFT".to_string()]
        );
    }

    #[tokio::test]
    async fn test_later_history_replaces_earlier() {
        let provider = ReplayProvider::from_messages(
            vec![
                historical("AAPL", vec![point(0, "1")]),
                historical("AAPL", vec![point(2, "3"), point(1, "2")]),
            ],
            Duration::ZERO,
        );
        let histories = provider.fetch_history(&["AAPL".to_string()]).await.unwrap();
        assert_eq!(histories.len(), 1);
        assert_eq!(histories[0].samples.len(), 2);
        assert_eq!(
            histories[0].samples[1].timestamp - histories[0].samples[0].timestamp,
            ChronoDuration::minutes(1)
        );
    }

    #[test]
    fn test_malformed_live_message_is_skipped() {
        let provider = ReplayProvider::from_messages(
            vec![
                ServerMessage::Live {
                    new_value: WireSeries {
                        symbol: "AAPL".to_string(),
                        data: vec![point(3, "bad")],
                    },
                },
                ServerMessage::Live {
                    new_value: WireSeries {
                        symbol: "AAPL".to_string(),
                        data: vec![point(4, "4")],
                    },
                },
            ],
            Duration::ZERO,
        );
        let live = provider.live_samples(&["AAPL".to_string()]);
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].sample.open, 4.0);
    }
}
