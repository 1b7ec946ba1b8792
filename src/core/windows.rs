//! Calendar boundaries of the day, week and month spending windows.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};

use crate::domain::BudgetWindow;

/// Start instants of the three overlapping windows that end at `now`.
///
/// Boundaries are local midnights in the timezone of the reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpendingWindows {
    pub now: DateTime<Utc>,
    pub day_start: DateTime<Utc>,
    pub week_start: DateTime<Utc>,
    pub month_start: DateTime<Utc>,
}

impl SpendingWindows {
    pub fn containing<Tz: TimeZone>(now: &DateTime<Tz>, first_weekday: Weekday) -> Self {
        let tz = now.timezone();
        let today = now.date_naive();
        let days_into_week = (today.weekday().num_days_from_sunday() + 7
            - first_weekday.num_days_from_sunday())
            % 7;
        let week_date = today - Duration::days(days_into_week as i64);
        let month_date = today.with_day(1).unwrap_or(today);

        Self {
            now: now.with_timezone(&Utc),
            day_start: local_midnight(&tz, today),
            week_start: local_midnight(&tz, week_date),
            month_start: local_midnight(&tz, month_date),
        }
    }

    pub fn start_of(&self, window: BudgetWindow) -> DateTime<Utc> {
        match window {
            BudgetWindow::Daily => self.day_start,
            BudgetWindow::Weekly => self.week_start,
            BudgetWindow::Monthly => self.month_start,
        }
    }

    /// True when `instant` lies in `[start, now]` for the window. Future
    /// instants are excluded from every window.
    pub fn contains(&self, window: BudgetWindow, instant: &DateTime<Utc>) -> bool {
        *instant >= self.start_of(window) && *instant <= self.now
    }
}

// A DST gap can skip local midnight; the wall time is then read as UTC.
fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| tz.from_utc_datetime(&naive))
        .with_timezone(&Utc)
}
