use tickview_core::chart::entity::{BoundaryMode, Candle, ChartMode, LinePoint, ResampledSeries};
use tickview_core::chart::error::ResampleError;
use tickview_core::market::entity::RawSample;

/// # Summary
/// 计算每桶包含的原始采样数。
///
/// # Arguments
/// * `interval_ms`: 分桶周期。
/// * `cadence_ms`: 采样频率 F。
///
/// # Returns
/// `interval / F`；周期不是 F 的正整数倍或 F 为 0 时返回 `Configuration` 错误。
pub fn bucket_size(interval_ms: u64, cadence_ms: u64) -> Result<usize, ResampleError> {
    let invalid = ResampleError::Configuration {
        interval_ms,
        cadence_ms,
    };
    if cadence_ms == 0 || interval_ms == 0 || interval_ms % cadence_ms != 0 {
        return Err(invalid);
    }
    usize::try_from(interval_ms / cadence_ms).map_err(|_| invalid)
}

/// 单个桶：覆盖的采样与作为收盘值的价格
struct Bucket<'a> {
    samples: &'a [RawSample],
    close: f64,
}

/// # Summary
/// 按边界策略把切片划分为桶。
///
/// # Logic
/// - `Inclusive`：`i` 从 `size` 起以 `size` 递增且 `i < len`，桶为 `slice[i-size ..= i]`，
///   收盘值取 `slice[i].open`（即下一桶的开盘价）。
/// - `HalfOpen`：只保留完整的 `slice[k*size .. (k+1)*size]`，收盘值同样取下一桶首条采样
///   `slice[(k+1)*size].open`；切片末尾没有下一条采样时取桶内最后一条的开盘价。
fn split(slice: &[RawSample], size: usize, boundary: BoundaryMode) -> Vec<Bucket<'_>> {
    if size == 0 {
        return Vec::new();
    }
    match boundary {
        BoundaryMode::Inclusive => (size..slice.len())
            .step_by(size)
            .filter_map(|i| {
                let samples = slice.get(i - size..=i)?;
                let close = samples.last()?.open;
                Some(Bucket { samples, close })
            })
            .collect(),
        BoundaryMode::HalfOpen => slice
            .chunks_exact(size)
            .enumerate()
            .filter_map(|(k, samples)| {
                // 最后一桶之后没有采样时，退回桶内最后一条的开盘价
                let close = slice
                    .get((k + 1) * size)
                    .or_else(|| samples.last())?
                    .open;
                Some(Bucket { samples, close })
            })
            .collect(),
    }
}

/// # Summary
/// 将连续切片折叠为 K 线或折线点。
///
/// # Logic
/// 1. 按边界策略切分桶。
/// 2. 蜡烛图：开盘取桶首采样的开盘价，收盘见 `split`，最高/最低取桶内极值。
/// 3. 折线图：取桶首采样开盘价与收盘价的均值。
/// 4. 时间戳均取桶首采样的时间。
///
/// # Arguments
/// * `slice`: 原始序列的连续切片。
/// * `size`: 每桶采样数，见 `bucket_size`。
/// * `mode`: 输出模式。
/// * `boundary`: 边界策略。
///
/// # Returns
/// 升序的重采样结果。纯函数，相同输入总是得到相同输出。
pub fn bucket(
    slice: &[RawSample],
    size: usize,
    mode: ChartMode,
    boundary: BoundaryMode,
) -> ResampledSeries {
    let buckets = split(slice, size, boundary);
    match mode {
        ChartMode::Candle => {
            ResampledSeries::Candles(buckets.iter().filter_map(to_candle).collect())
        }
        ChartMode::Line => ResampledSeries::Line(buckets.iter().filter_map(to_point).collect()),
    }
}

fn to_candle(bucket: &Bucket<'_>) -> Option<Candle> {
    let first = bucket.samples.first()?;
    let (high, low) = bucket
        .samples
        .iter()
        .fold((first.high, first.low), |(high, low), s| {
            (high.max(s.high), low.min(s.low))
        });
    Some(Candle {
        timestamp: first.timestamp,
        open: first.open,
        high,
        low,
        close: bucket.close,
    })
}

fn to_point(bucket: &Bucket<'_>) -> Option<LinePoint> {
    let first = bucket.samples.first()?;
    Some(LinePoint {
        timestamp: first.timestamp,
        value: (first.open + first.close) / 2.0,
    })
}
