//! Calendar month model.
//!
//! A month is the unit of display, auto-generation, and sharing. Weekday
//! indices follow the 0=Sunday..6=Saturday convention used by the class-day
//! pattern configuration.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A calendar month (year + 1-based month number).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Month {
    /// Calendar year.
    pub year: i32,
    /// Month number, 1-12.
    pub month: u32,
}

impl Month {
    /// Creates a month. `month` is 1-12.
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// The month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Number of days in this month.
    pub fn day_count(&self) -> u32 {
        let first = NaiveDate::from_ymd_opt(self.year, self.month, 1);
        match first {
            Some(d) => {
                let next = self.next();
                let next_first =
                    NaiveDate::from_ymd_opt(next.year, next.month, 1).unwrap_or(d);
                (next_first - d).num_days() as u32
            }
            None => 0,
        }
    }

    /// Every date of this month in order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        (1..=self.day_count())
            .filter_map(|day| NaiveDate::from_ymd_opt(self.year, self.month, day))
            .collect()
    }

    /// Whether `date` falls in this month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Dates of this month whose weekday index (0=Sun..6=Sat) is in `pattern`.
    pub fn class_dates(&self, pattern: &[u32]) -> Vec<NaiveDate> {
        self.dates()
            .into_iter()
            .filter(|d| pattern.contains(&weekday_index(*d)))
            .collect()
    }

    /// The preceding month.
    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Self::new(self.year - 1, 12)
        } else {
            Self::new(self.year, self.month - 1)
        }
    }

    /// The following month.
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }
}

/// Weekday index of `date`, 0=Sunday..6=Saturday.
pub fn weekday_index(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}
