use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tickview_core::market::entity::{LiveSample, RawSample, SymbolHistory};
use tickview_core::market::error::MarketError;

/// # Summary
/// 行情服务器推送的消息，以 `response-type` 字段区分类型。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "response-type", rename_all = "lowercase")]
pub enum ServerMessage {
    // 可订阅的证券代码列表
    List { symbols: Vec<String> },
    // 批量历史数据，每个证券一组，组内按时间降序
    Historical { data: Vec<WireSeries> },
    // 单条实时推送
    Live {
        #[serde(rename = "new-value")]
        new_value: WireSeries,
    },
}

/// # Summary
/// 线路格式的单个证券数据组。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireSeries {
    pub symbol: String,
    pub data: Vec<WirePoint>,
}

/// # Summary
/// 线路格式的单条采样，价格可能是字符串或数字。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WirePoint {
    pub timestamp: DateTime<Utc>,
    pub open: WirePrice,
    pub high: WirePrice,
    pub low: WirePrice,
    pub close: WirePrice,
}

/// # Summary
/// 线路格式的价格字段。历史数据以十进制字符串传输，部分实时推送使用数字。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WirePrice {
    Text(String),
    Number(f64),
}

impl WirePrice {
    /// # Summary
    /// 解析为浮点价格。
    ///
    /// # Arguments
    /// * `field`: 字段名，仅用于错误信息。
    ///
    /// # Returns
    /// 有限数值返回 Ok，非法字符串、NaN 或无穷大返回 `MarketError::Parse`。
    pub fn value(&self, field: &str) -> Result<f64, MarketError> {
        let value = match self {
            WirePrice::Number(v) => *v,
            WirePrice::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|e| MarketError::Parse(format!("{} '{}': {}", field, text, e)))?,
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(MarketError::Parse(format!("{} is not finite", field)))
        }
    }
}

impl WirePoint {
    pub fn to_sample(&self) -> Result<RawSample, MarketError> {
        Ok(RawSample {
            timestamp: self.timestamp,
            open: self.open.value("open")?,
            high: self.high.value("high")?,
            low: self.low.value("low")?,
            close: self.close.value("close")?,
        })
    }
}

impl WireSeries {
    /// # Summary
    /// 转换为升序的历史序列。
    ///
    /// # Logic
    /// 服务器按时间降序发送历史数据，解析后整体反转。任意一条价格非法则整组失败。
    pub fn into_history(self) -> Result<SymbolHistory, MarketError> {
        let mut samples = self
            .data
            .iter()
            .map(WirePoint::to_sample)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| MarketError::Parse(format!("{}: {}", self.symbol, e)))?;
        samples.reverse();
        Ok(SymbolHistory {
            symbol: self.symbol,
            samples,
        })
    }

    /// # Summary
    /// 转换为实时采样，只取第一条数据。
    ///
    /// # Returns
    /// 数据为空时返回 `MarketError::NotFound`。
    pub fn into_live(self) -> Result<LiveSample, MarketError> {
        let point = self.data.first().ok_or(MarketError::NotFound)?;
        let sample = point
            .to_sample()
            .map_err(|e| MarketError::Parse(format!("{}: {}", self.symbol, e)))?;
        Ok(LiveSample {
            symbol: self.symbol,
            sample,
        })
    }
}

/// 解码单条服务器消息
pub fn decode(text: &str) -> Result<ServerMessage, MarketError> {
    serde_json::from_str(text).map_err(|e| MarketError::Parse(e.to_string()))
}

/// 解码一段录制的消息序列（JSON 数组）
pub fn decode_all(text: &str) -> Result<Vec<ServerMessage>, MarketError> {
    serde_json::from_str(text).map_err(|e| MarketError::Parse(e.to_string()))
}
