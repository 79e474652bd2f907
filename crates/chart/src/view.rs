use crate::resampler::Resampler;
use chrono::{DateTime, TimeZone, Utc};
use tickview_core::chart::entity::{ChartSpec, ChartView, SymbolSeries};
use tickview_core::chart::error::ResampleError;
use tickview_core::market::port::SeriesSource;
use tracing::warn;

/// # Summary
/// 按图表规格生成完整视图。
///
/// # Logic
/// 1. 单个证券绘制蜡烛图，多个证券各自重采样为折线叠加。
/// 2. 每个证券独立取快照并换算窗口（各序列长度可以不同）。
/// 3. 叠加图中缺数据的证券记录告警后跳过；全部缺失时返回首个错误。
///
/// # Arguments
/// * `resampler`: 重采样器。
/// * `source`: 序列快照来源。
/// * `spec`: 图表规格。
/// * `now`: 当前时间。
/// * `tz`: 本地时区。
///
/// # Returns
/// 成功返回视图；规格中没有任何代码时返回 `NoData`。
pub fn render<Tz: TimeZone>(
    resampler: &Resampler,
    source: &dyn SeriesSource,
    spec: &ChartSpec,
    now: DateTime<Utc>,
    tz: &Tz,
) -> Result<ChartView, ResampleError> {
    let mode = spec.mode();
    let mut series = Vec::with_capacity(spec.symbols.len());
    let mut first_error = None;

    for symbol in &spec.symbols {
        let result = source
            .snapshot(symbol)
            .ok_or_else(|| ResampleError::NoData(symbol.clone()))
            .and_then(|snapshot| {
                resampler.resample(&snapshot, &spec.window, spec.interval, mode, now, tz)
            });
        match result {
            Ok(data) => series.push(SymbolSeries {
                symbol: symbol.clone(),
                series: data,
            }),
            Err(e) => {
                warn!("Chart '{}' skipped {}: {}", spec.symbols.join(", "), symbol, e);
                first_error.get_or_insert(e);
            }
        }
    }

    if series.is_empty() {
        return Err(first_error.unwrap_or_else(|| ResampleError::NoData(String::new())));
    }

    Ok(ChartView {
        title: spec.title(),
        mode,
        series,
    })
}
