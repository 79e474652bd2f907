use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub mod time;

/// 一分钟对应的毫秒数
pub const MILLIS_PER_MINUTE: u64 = 60_000;
/// 一天对应的毫秒数
pub const MILLIS_PER_DAY: u64 = 86_400_000;

/// # Summary
/// 图表分桶周期枚举，定义一根 K 线（或一个折线点）覆盖的时间跨度。
///
/// # Invariants
/// - 毫秒值必须是原始采样频率的正整数倍，由重采样器在使用前校验。
/// - 序列化形式为人类可读标签（例如 "1 hour"）。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub enum BucketInterval {
    // 5分钟
    Minute5,
    // 15分钟
    Minute15,
    // 1小时
    Hour1,
    // 1日
    Day1,
}

impl BucketInterval {
    /// 全部可选周期，按跨度升序排列。
    pub const ALL: [BucketInterval; 4] = [
        BucketInterval::Minute5,
        BucketInterval::Minute15,
        BucketInterval::Hour1,
        BucketInterval::Day1,
    ];

    /// # Summary
    /// 获取周期对应的毫秒数。
    ///
    /// # Returns
    /// 300000 / 900000 / 3600000 / 86400000。
    pub fn as_millis(self) -> u64 {
        match self {
            BucketInterval::Minute5 => 5 * MILLIS_PER_MINUTE,
            BucketInterval::Minute15 => 15 * MILLIS_PER_MINUTE,
            BucketInterval::Hour1 => 60 * MILLIS_PER_MINUTE,
            BucketInterval::Day1 => MILLIS_PER_DAY,
        }
    }

    /// 展示给用户的标签。
    pub fn label(self) -> &'static str {
        match self {
            BucketInterval::Minute5 => "5 minutes",
            BucketInterval::Minute15 => "15 minutes",
            BucketInterval::Hour1 => "1 hour",
            BucketInterval::Day1 => "1 day",
        }
    }

    /// # Summary
    /// 由毫秒数反查周期。
    ///
    /// # Arguments
    /// * `millis`: 周期毫秒数。
    ///
    /// # Returns
    /// 命中预设则返回对应周期，否则返回 None。
    pub fn from_millis(millis: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.as_millis() == millis)
    }
}

impl FromStr for BucketInterval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "5m" | "minute5" | "5 minutes" => Ok(BucketInterval::Minute5),
            "15m" | "minute15" | "15 minutes" => Ok(BucketInterval::Minute15),
            "1h" | "hour1" | "1 hour" => Ok(BucketInterval::Hour1),
            "1d" | "day1" | "1 day" => Ok(BucketInterval::Day1),
            _ => Err(format!("Unknown BucketInterval: {}", s)),
        }
    }
}

impl TryFrom<String> for BucketInterval {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BucketInterval> for String {
    fn from(value: BucketInterval) -> Self {
        value.label().to_string()
    }
}

impl std::fmt::Display for BucketInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// # Summary
/// 相对时间范围预设，对应图表组件中 "最近 N" 的下拉选项。
///
/// # Invariants
/// - 月按 30 天、季度按 90 天计算。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub enum RangePreset {
    Last24Hours,
    Last3Days,
    LastWeek,
    Last2Weeks,
    LastMonth,
    LastQuarter,
}

impl RangePreset {
    pub const ALL: [RangePreset; 6] = [
        RangePreset::Last24Hours,
        RangePreset::Last3Days,
        RangePreset::LastWeek,
        RangePreset::Last2Weeks,
        RangePreset::LastMonth,
        RangePreset::LastQuarter,
    ];

    /// 预设跨度的毫秒数。
    pub fn as_millis(self) -> u64 {
        match self {
            RangePreset::Last24Hours => MILLIS_PER_DAY,
            RangePreset::Last3Days => 3 * MILLIS_PER_DAY,
            RangePreset::LastWeek => 7 * MILLIS_PER_DAY,
            RangePreset::Last2Weeks => 14 * MILLIS_PER_DAY,
            RangePreset::LastMonth => 30 * MILLIS_PER_DAY,
            RangePreset::LastQuarter => 90 * MILLIS_PER_DAY,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RangePreset::Last24Hours => "Last 24 hours",
            RangePreset::Last3Days => "Last 3 Days",
            RangePreset::LastWeek => "Last Week",
            RangePreset::Last2Weeks => "Last 2 Weeks",
            RangePreset::LastMonth => "Last Month",
            RangePreset::LastQuarter => "Last Quarter",
        }
    }

    pub fn from_millis(millis: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_millis() == millis)
    }
}

impl FromStr for RangePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        if let Some(preset) = Self::ALL
            .into_iter()
            .find(|p| p.label().to_lowercase() == lowered)
        {
            return Ok(preset);
        }
        match lowered.as_str() {
            "24h" | "1d" => Ok(RangePreset::Last24Hours),
            "3d" => Ok(RangePreset::Last3Days),
            "1w" | "7d" => Ok(RangePreset::LastWeek),
            "2w" | "14d" => Ok(RangePreset::Last2Weeks),
            "30d" => Ok(RangePreset::LastMonth),
            "90d" => Ok(RangePreset::LastQuarter),
            _ => Err(format!("Unknown RangePreset: {}", s)),
        }
    }
}

impl TryFrom<String> for RangePreset {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RangePreset> for String {
    fn from(value: RangePreset) -> Self {
        value.label().to_string()
    }
}

impl std::fmt::Display for RangePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_millis_and_labels() {
        assert_eq!(BucketInterval::Minute5.as_millis(), 300_000);
        assert_eq!(BucketInterval::Minute15.as_millis(), 900_000);
        assert_eq!(BucketInterval::Hour1.as_millis(), 3_600_000);
        assert_eq!(BucketInterval::Day1.as_millis(), 86_400_000);
        assert_eq!(BucketInterval::from_millis(900_000), Some(BucketInterval::Minute15));
        assert_eq!(BucketInterval::from_millis(60_000), None);
        assert_eq!("1 hour".parse::<BucketInterval>(), Ok(BucketInterval::Hour1));
        assert_eq!("15M".parse::<BucketInterval>(), Ok(BucketInterval::Minute15));
        assert!("2 hours".parse::<BucketInterval>().is_err());
    }

    #[test]
    fn test_range_preset_parse() {
        assert_eq!("Last Week".parse::<RangePreset>(), Ok(RangePreset::LastWeek));
        assert_eq!("90d".parse::<RangePreset>(), Ok(RangePreset::LastQuarter));
        assert_eq!(RangePreset::Last2Weeks.as_millis(), 1_209_600_000);
        assert_eq!(RangePreset::LastQuarter.as_millis(), 7_776_000_000);
        assert_eq!(
            RangePreset::from_millis(259_200_000),
            Some(RangePreset::Last3Days)
        );
    }

    #[test]
    fn test_interval_serde_uses_label() {
        let json = serde_json::to_string(&BucketInterval::Day1).unwrap();
        assert_eq!(json, "\"1 day\"");
        let back: BucketInterval = serde_json::from_str("\"5 minutes\"").unwrap();
        assert_eq!(back, BucketInterval::Minute5);
    }
}
