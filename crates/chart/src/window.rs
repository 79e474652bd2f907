use chrono::{DateTime, Days, Duration, NaiveDate, TimeZone, Utc};
use tickview_core::chart::entity::{BoundaryMode, WindowRequest};
use tickview_core::chart::error::ResampleError;
use tickview_core::common::time::{date_midnight, local_midnight};
use tickview_core::market::entity::RawSample;
use tracing::debug;

/// # Summary
/// 原始序列上的半开切片区间 `[start, end)`。
///
/// # Invariants
/// - `0 <= start <= end <= len`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceBounds {
    pub start: usize,
    pub end: usize,
}

impl SliceBounds {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 在给定序列上取出对应切片，越界时返回空切片
    pub fn apply<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        items.get(self.start..self.end).unwrap_or(&[])
    }
}

/// # Summary
/// 将窗口请求换算为原始序列上的切片区间。
///
/// # Logic
/// 1. 相对窗口：`end = len`，`start = len - duration / F - guard`。
/// 2. 固定窗口：以当日本地零点的采样为锚点，按日期差反推起止索引。
/// 3. 起点越界归 0，终点越界归 `len`，起点不超过终点。
///
/// # Arguments
/// * `samples`: 升序原始采样。
/// * `request`: 窗口请求。
/// * `cadence_ms`: 采样频率 F。
/// * `boundary`: 分桶边界策略，决定保护偏移。
/// * `now`: 调用方注入的当前时间。
/// * `tz`: 用于确定自然日的本地时区。
///
/// # Returns
/// 成功返回钳制后的切片区间；序列为空、频率为 0、零点锚点缺失时返回错误。
pub fn resolve_slice<Tz: TimeZone>(
    samples: &[RawSample],
    request: &WindowRequest,
    cadence_ms: u64,
    boundary: BoundaryMode,
    now: DateTime<Utc>,
    tz: &Tz,
) -> Result<SliceBounds, ResampleError> {
    if samples.is_empty() {
        return Err(ResampleError::EmptySeries);
    }
    let cadence = i64::try_from(cadence_ms)
        .ok()
        .filter(|c| *c > 0)
        .ok_or(ResampleError::Configuration {
            interval_ms: 0,
            cadence_ms,
        })?;
    let guard = boundary.guard_offset();
    let len = samples.len();
    let len_i = to_i64(len);

    let (start, end) = match request {
        WindowRequest::Relative { duration_ms } => {
            let span = i64::try_from(*duration_ms).unwrap_or(i64::MAX) / cadence;
            (len_i.saturating_sub(span).saturating_sub(guard), len_i)
        }
        WindowRequest::Fixed { start, end } => {
            resolve_fixed(samples, *start, *end, cadence, guard, now, tz)?
        }
    };

    let bounds = clamp(start, end, len);
    debug!(
        "Window {:?} resolved to [{}, {}) of {} (raw [{}, {}))",
        request, bounds.start, bounds.end, len, start, end
    );
    Ok(bounds)
}

/// # Summary
/// 固定窗口的原始（未钳制）索引计算。
///
/// # Logic
/// 1. `today` 为 `now` 所在本地自然日的零点。
/// 2. 从尾部向前寻找时间恰好等于 `today` 的采样，`since_midnight = len - 其索引`。
/// 3. 距今超过整段历史的日期先收敛到 `today ± horizon`，
///    `s = 零点(start)`，`e = 零点(end) + 1 天`，`e` 溢出时终点直接取 `len`。
/// 4. `start = len - ((today - s) / F + since_midnight)`，
///    `end = len - ((today - e) / F + since_midnight - guard)`。
fn resolve_fixed<Tz: TimeZone>(
    samples: &[RawSample],
    start: NaiveDate,
    end: NaiveDate,
    cadence: i64,
    guard: i64,
    now: DateTime<Utc>,
    tz: &Tz,
) -> Result<(i64, i64), ResampleError> {
    let len = to_i64(samples.len());
    let today = local_midnight(now, tz)
        .ok_or_else(|| ResampleError::LocalTime(format!("no local midnight for {}", now)))?;

    let anchor = samples
        .iter()
        .rposition(|s| s.timestamp == today)
        .ok_or(ResampleError::MidnightAnchorMissing(today))?;
    let since_midnight = len - to_i64(anchor);

    // 超出 today ± horizon 的日期与边界日期钳制结果相同
    let today_date = now.with_timezone(tz).date_naive();
    let day_ms = Duration::days(1).num_milliseconds();
    let span_days = len.saturating_add(4).saturating_mul(cadence) / day_ms + 2;
    let horizon = Days::new(u64::try_from(span_days).unwrap_or(u64::MAX));
    let start = clamp_date(start, today_date, horizon);
    let end = clamp_date(end, today_date, horizon);

    let s = midnight_of(start, tz)?;
    let start_idx = len - ((today - s).num_milliseconds() / cadence + since_midnight);
    let end_idx = match midnight_of(end, tz)?.checked_add_signed(Duration::days(1)) {
        Some(e) => len - ((today - e).num_milliseconds() / cadence + since_midnight - guard),
        None => len,
    };
    Ok((start_idx, end_idx))
}

fn clamp_date(date: NaiveDate, today: NaiveDate, horizon: Days) -> NaiveDate {
    let lo = today.checked_sub_days(horizon).unwrap_or(NaiveDate::MIN);
    let hi = today.checked_add_days(horizon).unwrap_or(NaiveDate::MAX);
    date.clamp(lo, hi)
}

fn midnight_of<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Result<DateTime<Utc>, ResampleError> {
    date_midnight(date, tz)
        .ok_or_else(|| ResampleError::LocalTime(format!("no local midnight on {}", date)))
}

/// 起点越界归 0，终点越界归 len，并保证 start <= end
fn clamp(start: i64, end: i64, len: usize) -> SliceBounds {
    let in_range = |v: i64| usize::try_from(v).ok().filter(|v| *v <= len);
    let end = in_range(end).unwrap_or(len);
    let start = in_range(start).unwrap_or(0).min(end);
    SliceBounds { start, end }
}

fn to_i64(v: usize) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}
