use crate::common::{BucketInterval, RangePreset};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// # Summary
/// 图表显示窗口请求。
///
/// # Invariants
/// - `Relative` 以最新采样为终点向前回溯 `duration_ms`。
/// - `Fixed` 覆盖本地自然日 `[start, end]`（含 `end` 整天）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WindowRequest {
    // 相对窗口：最近一段时长
    Relative { duration_ms: u64 },
    // 固定窗口：本地日历日期区间
    Fixed { start: NaiveDate, end: NaiveDate },
}

impl WindowRequest {
    /// 由相对范围预设构造窗口
    pub fn relative(preset: RangePreset) -> Self {
        WindowRequest::Relative {
            duration_ms: preset.as_millis(),
        }
    }

    /// # Summary
    /// 生成窗口的可读描述，用作图表副标题。
    ///
    /// # Returns
    /// 命中预设时返回预设标签（如 "Last Week"），否则按分钟描述；
    /// 固定窗口返回 "2026-03-01 to 2026-03-02"。
    pub fn describe(&self) -> String {
        match self {
            WindowRequest::Relative { duration_ms } => match RangePreset::from_millis(*duration_ms)
            {
                Some(preset) => preset.label().to_string(),
                None => format!("Last {} minutes", duration_ms / 60_000),
            },
            WindowRequest::Fixed { start, end } => format!("{} to {}", start, end),
        }
    }
}

/// # Summary
/// 重采样输出模式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartMode {
    // 蜡烛图 (OHLC)
    Candle,
    // 折线图，多个证券叠加显示时使用
    Line,
}

/// # Summary
/// 分桶边界策略。
///
/// # Invariants
/// - `Inclusive`：第 k 桶为 `slice[i-b ..= i]`，与相邻桶共享边界采样，窗口索引带 2 的保护偏移。
/// - `HalfOpen`：第 k 桶为 `slice[k*b .. (k+1)*b]`，桶之间互不重叠，无保护偏移。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryMode {
    Inclusive,
    #[default]
    HalfOpen,
}

impl BoundaryMode {
    /// 窗口索引计算中使用的保护偏移量
    pub fn guard_offset(self) -> i64 {
        match self {
            BoundaryMode::Inclusive => 2,
            BoundaryMode::HalfOpen => 0,
        }
    }
}

/// # Summary
/// 重采样后的单根 K 线。
///
/// # Invariants
/// - `timestamp` 为桶内第一条采样的时间。
/// - `low <= open, close <= high`。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// # Summary
/// 重采样后的折线点，取桶内首条采样开盘价与收盘价的均值。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinePoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// # Summary
/// 重采样结果。
///
/// # Invariants
/// - 按时间严格升序，桶之间不重叠。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "points", rename_all = "snake_case")]
pub enum ResampledSeries {
    Candles(Vec<Candle>),
    Line(Vec<LinePoint>),
}

impl ResampledSeries {
    pub fn len(&self) -> usize {
        match self {
            ResampledSeries::Candles(c) => c.len(),
            ResampledSeries::Line(l) => l.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn mode(&self) -> ChartMode {
        match self {
            ResampledSeries::Candles(_) => ChartMode::Candle,
            ResampledSeries::Line(_) => ChartMode::Line,
        }
    }

    /// 各桶的起始时间
    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        match self {
            ResampledSeries::Candles(c) => c.iter().map(|x| x.timestamp).collect(),
            ResampledSeries::Line(l) => l.iter().map(|x| x.timestamp).collect(),
        }
    }
}

/// # Summary
/// 图表组件配置：显示哪些证券、什么窗口、什么周期。
///
/// # Invariants
/// - `symbols` 至少包含一个代码；单个代码绘制蜡烛图，多个代码叠加折线。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub symbols: Vec<String>,
    pub window: WindowRequest,
    pub interval: BucketInterval,
}

impl ChartSpec {
    pub fn mode(&self) -> ChartMode {
        if self.symbols.len() > 1 {
            ChartMode::Line
        } else {
            ChartMode::Candle
        }
    }

    /// # Summary
    /// 图表标题。
    ///
    /// # Logic
    /// 首行为 "代码: Intervals of 周期"，次行为窗口描述。
    pub fn title(&self) -> String {
        format!(
            "{}: Intervals of {}\n{}",
            self.symbols.join(", "),
            self.interval.label(),
            self.window.describe()
        )
    }
}

/// 单个证券的重采样结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolSeries {
    pub symbol: String,
    pub series: ResampledSeries,
}

/// # Summary
/// 可直接交给绘图层的图表视图。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartView {
    pub title: String,
    pub mode: ChartMode,
    pub series: Vec<SymbolSeries>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_describe() {
        assert_eq!(
            WindowRequest::relative(RangePreset::Last3Days).describe(),
            "Last 3 Days"
        );
        assert_eq!(
            WindowRequest::Relative {
                duration_ms: 7_200_000
            }
            .describe(),
            "Last 120 minutes"
        );
        let fixed = WindowRequest::Fixed {
            start: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
        };
        assert_eq!(fixed.describe(), "2026-03-01 to 2026-03-02");
    }

    #[test]
    fn test_chart_spec_mode_and_title() {
        let spec = ChartSpec {
            symbols: vec!["AAPL".to_string()],
            window: WindowRequest::relative(RangePreset::Last24Hours),
            interval: BucketInterval::Hour1,
        };
        assert_eq!(spec.mode(), ChartMode::Candle);
        assert_eq!(spec.title(), "AAPL: Intervals of 1 hour\nLast 24 hours");

        let overlay = ChartSpec {
            symbols: vec!["AAPL".to_string(), "MSFT".to_string()],
            ..spec
        };
        assert_eq!(overlay.mode(), ChartMode::Line);
    }

    #[test]
    fn test_window_request_serde() {
        let json = r#"{"type":"fixed","start":"2026-03-01","end":"2026-03-02"}"#;
        let window: WindowRequest = serde_json::from_str(json).unwrap();
        assert!(matches!(window, WindowRequest::Fixed { .. }));

        let relative: WindowRequest =
            serde_json::from_str(r#"{"type":"relative","duration_ms":86400000}"#).unwrap();
        assert_eq!(relative, WindowRequest::relative(RangePreset::Last24Hours));
    }

    #[test]
    fn test_guard_offsets() {
        assert_eq!(BoundaryMode::Inclusive.guard_offset(), 2);
        assert_eq!(BoundaryMode::HalfOpen.guard_offset(), 0);
        assert_eq!(BoundaryMode::default(), BoundaryMode::HalfOpen);
    }
}
