use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime};

/// One calendar month, bounds inclusive at day granularity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthWindow {
    /// "2026-04"
    pub key: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl MonthWindow {
    pub fn of(year: i32, month: u32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let next_month_first = start.checked_add_months(Months::new(1))?;
        let end = next_month_first - Duration::days(1);
        Some(MonthWindow {
            key: format!("{:04}-{:02}", year, month),
            start,
            end,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// The `count` complete calendar months preceding the month of `today`,
/// oldest first. In October 2026 with count 6: 2026-04 … 2026-09.
pub fn trailing_months(today: NaiveDate, count: u32) -> Vec<MonthWindow> {
    let Some(current_first) = today.with_day(1) else {
        return Vec::new();
    };

    (1..=count)
        .rev()
        .filter_map(|back| current_first.checked_sub_months(Months::new(back)))
        .filter_map(|first| MonthWindow::of(first.year(), first.month()))
        .collect()
}

/// Whole days from `created` to `now`, never negative.
pub fn days_open(created: NaiveDateTime, now: NaiveDateTime) -> i64 {
    (now - created).num_days().max(0)
}
