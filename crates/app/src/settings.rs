use config::{Config, ConfigError, Environment, File};
use tickview_core::config::AppConfig;

/// 指定配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "TICKVIEW_CONFIG";
/// 未指定时使用的配置文件名（扩展名由 config 自动探测）
pub const DEFAULT_CONFIG_NAME: &str = "tickview";

/// # Summary
/// 确定配置文件路径。
///
/// # Logic
/// 命令行第一个参数优先，其次是 `TICKVIEW_CONFIG` 环境变量，最后使用默认文件名。
pub fn config_path() -> String {
    std::env::args()
        .nth(1)
        .or_else(|| std::env::var(CONFIG_PATH_ENV).ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_NAME.to_string())
}

/// # Summary
/// 加载应用配置。
///
/// # Logic
/// 1. 读取配置文件（不存在时忽略）。
/// 2. 叠加 `TICKVIEW__` 前缀的环境变量，以 `__` 分隔层级，例如 `TICKVIEW__MARKET__CADENCE_MS`。
/// 3. 未提供的字段使用 `AppConfig` 的默认值。
///
/// # Arguments
/// * `path`: 配置文件路径，可省略扩展名。
///
/// # Returns
/// 格式错误或类型不匹配时返回 `ConfigError`。
pub fn load(path: &str) -> Result<AppConfig, ConfigError> {
    Config::builder()
        .add_source(File::with_name(path).required(false))
        .add_source(
            Environment::with_prefix("TICKVIEW")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tickview_core::chart::entity::BoundaryMode;
    use tickview_core::common::BucketInterval;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent");
        let config = load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.market.cadence_ms, 60_000);
        assert_eq!(config.chart.boundary, BoundaryMode::HalfOpen);
    }

    #[test]
    fn test_toml_file_is_loaded() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            r#"
[market]
replay_path = "fixtures/session.json"
symbols = ["AAPL", "MSFT"]

[chart]
boundary = "inclusive"

[[chart.widgets]]
symbols = ["AAPL"]
interval = "15 minutes"
window = {{ type = "fixed", start = "2026-03-02", end = "2026-03-02" }}

[[portfolio.holdings]]
symbol = "AAPL"
units = 4
"#
        )
        .unwrap();

        let config = load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.market.replay_path, "fixtures/session.json");
        assert_eq!(config.market.symbols, vec!["AAPL".to_string(), "MSFT".to_string()]);
        assert_eq!(config.chart.boundary, BoundaryMode::Inclusive);
        assert_eq!(config.chart.widgets[0].interval, BucketInterval::Minute15);
        assert_eq!(config.portfolio.holdings[0].units, rust_decimal_macros::dec!(4));
        assert_eq!(config.log.level, "info");
    }
}
