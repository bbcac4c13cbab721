//! Calendar periods for plan cycles.
//!
//! A single strategy keyed by [`Cycle`] decides where a period starts and
//! where the next one begins. Everything is local wall-clock time; a period
//! covers `[start 00:00, next start 00:00)`.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime};

use daybook_api::Cycle;

/// One calendar period of a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    /// First day of the period.
    pub start: NaiveDate,
    /// First day of the next period (exclusive end).
    pub end: NaiveDate,
    /// Cycle the period belongs to.
    pub cycle: Cycle,
}

impl Period {
    /// The period of `cycle` that contains `date`.
    ///
    /// Returns `None` for [`Cycle::No`], which has no periods.
    #[must_use]
    pub fn containing(cycle: Cycle, date: NaiveDate) -> Option<Self> {
        let start = period_start(cycle, date)?;
        let end = next_period_start(cycle, start)?;
        Some(Self { start, end, cycle })
    }

    /// Returns true if the instant falls inside the period.
    #[must_use]
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        let day = at.date();
        self.start <= day && day < self.end
    }

    /// The period immediately before this one.
    #[must_use]
    pub fn previous(&self) -> Option<Self> {
        let day_before = self.start.pred_opt()?;
        Self::containing(self.cycle, day_before)
    }

    /// Display label (`2024-05-06`, `2024-05`, `2024`).
    #[must_use]
    pub fn label(&self) -> String {
        period_label(self.cycle, self.start)
    }
}

/// First day of the period containing `date`.
#[must_use]
pub fn period_start(cycle: Cycle, date: NaiveDate) -> Option<NaiveDate> {
    match cycle {
        Cycle::Day => Some(date),
        Cycle::Week => date.checked_sub_days(Days::new(u64::from(
            date.weekday().num_days_from_monday(),
        ))),
        Cycle::Month => date.with_day(1),
        Cycle::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1),
        Cycle::No => None,
    }
}

/// First day of the period after the one starting at `start`.
#[must_use]
pub fn next_period_start(cycle: Cycle, start: NaiveDate) -> Option<NaiveDate> {
    match cycle {
        Cycle::Day => start.checked_add_days(Days::new(1)),
        Cycle::Week => start.checked_add_days(Days::new(7)),
        Cycle::Month => start.checked_add_months(Months::new(1)),
        Cycle::Year => start.checked_add_months(Months::new(12)),
        Cycle::No => None,
    }
}

/// Label for a period start.
#[must_use]
pub fn period_label(cycle: Cycle, start: NaiveDate) -> String {
    match cycle {
        Cycle::Day | Cycle::Week | Cycle::No => start.format("%Y-%m-%d").to_string(),
        Cycle::Month => start.format("%Y-%m").to_string(),
        Cycle::Year => start.format("%Y").to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_week_starts_on_monday() {
        // 2024-05-08 is a Wednesday
        assert_eq!(period_start(Cycle::Week, d(2024, 5, 8)), Some(d(2024, 5, 6)));
        // Sunday belongs to the week that started the Monday before
        assert_eq!(period_start(Cycle::Week, d(2024, 5, 12)), Some(d(2024, 5, 6)));
        assert_eq!(period_start(Cycle::Week, d(2024, 5, 13)), Some(d(2024, 5, 13)));
    }

    #[test]
    fn test_week_across_year_boundary() {
        // 2025-01-01 is a Wednesday
        let period = Period::containing(Cycle::Week, d(2025, 1, 1)).unwrap();
        assert_eq!(period.start, d(2024, 12, 30));
        assert_eq!(period.end, d(2025, 1, 6));
        assert_eq!(period.label(), "2024-12-30");
    }

    #[test]
    fn test_month_and_year() {
        let month = Period::containing(Cycle::Month, d(2024, 2, 29)).unwrap();
        assert_eq!(month.start, d(2024, 2, 1));
        assert_eq!(month.end, d(2024, 3, 1));
        assert_eq!(month.label(), "2024-02");

        let december = Period::containing(Cycle::Month, d(2023, 12, 31)).unwrap();
        assert_eq!(december.end, d(2024, 1, 1));

        let year = Period::containing(Cycle::Year, d(2024, 7, 4)).unwrap();
        assert_eq!(year.start, d(2024, 1, 1));
        assert_eq!(year.end, d(2025, 1, 1));
        assert_eq!(year.label(), "2024");
    }

    #[test]
    fn test_day() {
        let day = Period::containing(Cycle::Day, d(2024, 3, 10)).unwrap();
        assert_eq!(day.end, d(2024, 3, 11));
        assert_eq!(day.label(), "2024-03-10");
    }

    #[test]
    fn test_no_cycle_has_no_period() {
        assert!(Period::containing(Cycle::No, d(2024, 1, 1)).is_none());
        assert!(period_start(Cycle::No, d(2024, 1, 1)).is_none());
    }

    #[test]
    fn test_contains_is_half_open() {
        let week = Period::containing(Cycle::Week, d(2024, 5, 8)).unwrap();
        let at = |day: NaiveDate, h: u32| day.and_hms_opt(h, 0, 0).unwrap();

        assert!(week.contains(at(d(2024, 5, 6), 0)));
        assert!(week.contains(at(d(2024, 5, 12), 23)));
        assert!(!week.contains(at(d(2024, 5, 13), 0)));
        assert!(!week.contains(at(d(2024, 5, 5), 23)));
    }

    #[test]
    fn test_previous() {
        let month = Period::containing(Cycle::Month, d(2024, 3, 15)).unwrap();
        let prev = month.previous().unwrap();
        assert_eq!(prev.start, d(2024, 2, 1));
        assert_eq!(prev.end, month.start);
    }
}
