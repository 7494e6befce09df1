use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};

/// Source of "today" for a report run. Read once per run so that every
/// classification in the run sees the same date.
pub trait Clock {
    fn today(&self) -> NaiveDate;

    /// Today at 00:00.
    fn today_midnight(&self) -> NaiveDateTime {
        self.today().and_time(NaiveTime::MIN)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Pinned date, for `--today` and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// File-name stamp such as "19-Oct".
pub fn date_stamp(day: NaiveDate) -> String {
    day.format("%d-%b").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let day = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let clock = FixedClock(day);
        assert_eq!(clock.today(), day);
        assert_eq!(clock.today_midnight(), day.and_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn test_date_stamp() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 4).unwrap();
        assert_eq!(date_stamp(day), "04-Mar");
    }
}
