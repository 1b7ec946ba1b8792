use chrono::{DateTime, FixedOffset, Local, TimeZone, Utc, Weekday};

use crate::core::windows::SpendingWindows;

/// Clock abstracts access to the current instant so services remain deterministic in tests.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;

    /// Window boundaries ending now, computed with the clock's timezone rules
    /// so each boundary uses the offset in force on its own date.
    fn windows(&self, first_weekday: Weekday) -> SpendingWindows;
}

/// Reads the operating system clock and local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn windows(&self, first_weekday: Weekday) -> SpendingWindows {
        SpendingWindows::containing(&Local::now(), first_weekday)
    }
}

/// Always reports the same instant, in whichever zone it was built with.
#[derive(Debug, Clone)]
pub struct FixedClock<Tz: TimeZone = FixedOffset>(pub DateTime<Tz>);

impl FixedClock {
    pub fn utc(instant: DateTime<Utc>) -> Self {
        Self(instant.fixed_offset())
    }
}

impl<Tz> Clock for FixedClock<Tz>
where
    Tz: TimeZone + Send + Sync,
    Tz::Offset: Send + Sync,
{
    fn now_utc(&self) -> DateTime<Utc> {
        self.0.with_timezone(&Utc)
    }

    fn windows(&self, first_weekday: Weekday) -> SpendingWindows {
        SpendingWindows::containing(&self.0, first_weekday)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::New_York;

    #[test]
    fn zoned_clock_uses_offset_of_each_boundary_date() {
        // 2024-11-10 12:00 EST; the 1st of the month was still EDT (UTC-4).
        let clock = FixedClock(New_York.with_ymd_and_hms(2024, 11, 10, 12, 0, 0).unwrap());
        let windows = clock.windows(Weekday::Sun);
        assert_eq!(
            windows.month_start,
            Utc.with_ymd_and_hms(2024, 11, 1, 4, 0, 0).unwrap()
        );
        assert_eq!(
            windows.day_start,
            Utc.with_ymd_and_hms(2024, 11, 10, 5, 0, 0).unwrap()
        );
        assert_eq!(
            clock.now_utc(),
            Utc.with_ymd_and_hms(2024, 11, 10, 17, 0, 0).unwrap()
        );
    }
}
