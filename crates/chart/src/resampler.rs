use crate::bucket::{bucket, bucket_size};
use crate::window::{SliceBounds, resolve_slice};
use chrono::{DateTime, TimeZone, Utc};
use tickview_core::chart::entity::{BoundaryMode, ChartMode, ResampledSeries, WindowRequest};
use tickview_core::chart::error::ResampleError;
use tickview_core::common::BucketInterval;
use tickview_core::config::AppConfig;
use tickview_core::market::entity::{RawSample, SeriesSnapshot};
use tracing::debug;

/// # Summary
/// 无状态重采样器，持有采样频率与分桶边界策略。
///
/// # Invariants
/// - `cadence_ms > 0`，在构造时校验。
/// - 不持有任何序列数据，可在多线程间自由复制与并发调用。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resampler {
    // 原始采样频率 F
    cadence_ms: u64,
    // 分桶边界策略
    boundary: BoundaryMode,
}

impl Resampler {
    /// # Summary
    /// 创建重采样器。
    ///
    /// # Arguments
    /// * `cadence_ms`: 原始采样频率。
    /// * `boundary`: 分桶边界策略。
    ///
    /// # Returns
    /// 频率为 0 时返回 `Configuration` 错误。
    pub fn new(cadence_ms: u64, boundary: BoundaryMode) -> Result<Self, ResampleError> {
        if cadence_ms == 0 {
            return Err(ResampleError::Configuration {
                interval_ms: 0,
                cadence_ms,
            });
        }
        Ok(Self {
            cadence_ms,
            boundary,
        })
    }

    /// 由应用配置构造，并预先校验全部图表组件的周期。
    pub fn from_config(config: &AppConfig) -> Result<Self, ResampleError> {
        let resampler = Self::new(config.market.cadence_ms, config.chart.boundary)?;
        for widget in &config.chart.widgets {
            resampler.bucket_size(widget.interval)?;
        }
        Ok(resampler)
    }

    pub fn cadence_ms(&self) -> u64 {
        self.cadence_ms
    }

    pub fn boundary(&self) -> BoundaryMode {
        self.boundary
    }

    /// 每桶包含的采样数
    pub fn bucket_size(&self, interval: BucketInterval) -> Result<usize, ResampleError> {
        bucket_size(interval.as_millis(), self.cadence_ms)
    }

    /// # Summary
    /// 将窗口请求换算为切片区间，详见 [`resolve_slice`]。
    pub fn resolve_slice<Tz: TimeZone>(
        &self,
        samples: &[RawSample],
        request: &WindowRequest,
        now: DateTime<Utc>,
        tz: &Tz,
    ) -> Result<SliceBounds, ResampleError> {
        resolve_slice(samples, request, self.cadence_ms, self.boundary, now, tz)
    }

    /// # Summary
    /// 将切片折叠为指定周期的桶，详见 [`bucket`]。
    pub fn bucket(
        &self,
        slice: &[RawSample],
        interval: BucketInterval,
        mode: ChartMode,
    ) -> Result<ResampledSeries, ResampleError> {
        let size = self.bucket_size(interval)?;
        Ok(bucket(slice, size, mode, self.boundary))
    }

    /// # Summary
    /// 对一个序列快照执行完整的窗口切片与分桶。
    ///
    /// # Logic
    /// 1. 快照为空时返回 `NoData`。
    /// 2. 校验周期，换算切片区间。
    /// 3. 对切片分桶。
    ///
    /// # Arguments
    /// * `snapshot`: 证券序列快照。
    /// * `request`: 窗口请求。
    /// * `interval`: 分桶周期。
    /// * `mode`: 输出模式。
    /// * `now`: 当前时间。
    /// * `tz`: 本地时区。
    ///
    /// # Returns
    /// 重采样结果。
    pub fn resample<Tz: TimeZone>(
        &self,
        snapshot: &SeriesSnapshot,
        request: &WindowRequest,
        interval: BucketInterval,
        mode: ChartMode,
        now: DateTime<Utc>,
        tz: &Tz,
    ) -> Result<ResampledSeries, ResampleError> {
        if snapshot.is_empty() {
            return Err(ResampleError::NoData(snapshot.symbol.clone()));
        }
        let size = self.bucket_size(interval)?;
        let bounds = self.resolve_slice(snapshot.as_slice(), request, now, tz)?;
        let series = bucket(bounds.apply(snapshot.as_slice()), size, mode, self.boundary);
        debug!(
            "Resampled {} [{}, {}) into {} {:?} buckets of {}",
            snapshot.symbol,
            bounds.start,
            bounds.end,
            series.len(),
            mode,
            interval
        );
        Ok(series)
    }
}
