use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::sync::RwLock;

/// # Summary
/// 时间供给器接口，用于隔离物理系统时钟。
/// 窗口计算必须通过调用方注入的时间进行，不得在内部直接读取系统时钟。
pub trait TimeProvider: Send + Sync {
    /// 获取当前挂载的时间
    fn now(&self) -> DateTime<Utc>;
}

/// # Summary
/// 普通运行使用的真实时钟，直接返回操作系统当前时间。
pub struct RealTimeProvider;

impl TimeProvider for RealTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// # Summary
/// 测试与回放专用虚拟时钟，允许主动拨快或回退时间。
///
/// # Invariants
/// - 并发安全：内部利用 `RwLock` 提供多线程安全的读写。
pub struct FakeClockProvider {
    current_time: RwLock<DateTime<Utc>>,
}

impl FakeClockProvider {
    /// 使用指定的初始时间创建虚拟时钟
    pub fn new(initial_time: DateTime<Utc>) -> Self {
        Self {
            current_time: RwLock::new(initial_time),
        }
    }

    /// 强制修改时钟的当前时间
    pub fn set_time(&self, new_time: DateTime<Utc>) {
        let mut time = self.current_time.write().unwrap_or_else(|e| e.into_inner());
        *time = new_time;
    }

    /// 将时钟向前拨动指定时长
    pub fn advance(&self, delta: chrono::Duration) {
        let mut time = self.current_time.write().unwrap_or_else(|e| e.into_inner());
        *time += delta;
    }
}

impl TimeProvider for FakeClockProvider {
    fn now(&self) -> DateTime<Utc> {
        *self.current_time.read().unwrap_or_else(|e| e.into_inner())
    }
}

/// # Summary
/// 计算某个自然日在指定时区下的零点，并换算为 UTC 时刻。
///
/// # Logic
/// 1. 将日期与 00:00:00 组合为本地时间。
/// 2. 交由时区解析；夏令时重叠时取较早的时刻。
///
/// # Arguments
/// * `date`: 本地自然日。
/// * `tz`: 本地时区。
///
/// # Returns
/// 零点不存在（时区在零点跳变）时返回 None。
pub fn date_midnight<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Option<DateTime<Utc>> {
    let naive = date.and_hms_opt(0, 0, 0)?;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// # Summary
/// 计算某一时刻所在本地自然日的零点。
///
/// # Arguments
/// * `instant`: 任意 UTC 时刻。
/// * `tz`: 本地时区。
///
/// # Returns
/// 当日本地零点对应的 UTC 时刻。
pub fn local_midnight<Tz: TimeZone>(instant: DateTime<Utc>, tz: &Tz) -> Option<DateTime<Utc>> {
    date_midnight(instant.with_timezone(tz).date_naive(), tz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_fake_clock_set_and_advance() {
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 9, 30, 0).unwrap();
        let clock = FakeClockProvider::new(start);
        assert_eq!(clock.now(), start);

        clock.advance(chrono::Duration::minutes(5));
        assert_eq!(clock.now(), start + chrono::Duration::minutes(5));

        let later = Utc.with_ymd_and_hms(2026, 3, 3, 0, 0, 0).unwrap();
        clock.set_time(later);
        assert_eq!(clock.now(), later);
    }

    #[test]
    fn test_local_midnight_in_offset_zone() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        // 本地 2026-03-02 01:30 (+02:00)
        let instant = Utc.with_ymd_and_hms(2026, 3, 1, 23, 30, 0).unwrap();
        let midnight = local_midnight(instant, &tz).unwrap();
        assert_eq!(midnight, Utc.with_ymd_and_hms(2026, 3, 1, 22, 0, 0).unwrap());
    }

    #[test]
    fn test_date_midnight_utc() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        assert_eq!(
            date_midnight(date, &Utc),
            Some(Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap())
        );
    }
}
