use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// # Summary
/// 单条原始行情采样，由行情源按固定频率产生。
///
/// # Invariants
/// - 同一序列内按 `timestamp` 严格升序，每个采样周期一条。
/// - `high` 必须大于或等于 `low`, `open`, `close`。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    // 采样时间
    pub timestamp: DateTime<Utc>,
    // 开盘价
    pub open: f64,
    // 最高价
    pub high: f64,
    // 最低价
    pub low: f64,
    // 收盘价
    pub close: f64,
}

/// # Summary
/// 某一证券的完整历史采样，由行情源一次性回补。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolHistory {
    pub symbol: String,
    pub samples: Vec<RawSample>,
}

/// # Summary
/// 实时推送的单条采样，附带所属证券代码。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveSample {
    pub symbol: String,
    pub sample: RawSample,
}

/// # Summary
/// 某一证券原始序列的不可变快照。
///
/// # Invariants
/// - 快照创建后内容不再改变；新数据到达时由持有方生成新的快照。
/// - 克隆只复制 `Arc` 指针，开销与序列长度无关。
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSnapshot {
    // 证券代码
    pub symbol: String,
    // 升序采样数据
    pub samples: Arc<Vec<RawSample>>,
}

impl SeriesSnapshot {
    pub fn new(symbol: impl Into<String>, samples: Vec<RawSample>) -> Self {
        Self {
            symbol: symbol.into(),
            samples: Arc::new(samples),
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// 最新一条采样
    pub fn last(&self) -> Option<&RawSample> {
        self.samples.last()
    }

    pub fn as_slice(&self) -> &[RawSample] {
        self.samples.as_slice()
    }
}
