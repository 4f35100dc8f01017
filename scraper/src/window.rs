use chrono::{Datelike, Duration, NaiveDate};
use clap::ValueEnum;

use crate::cancellations::CancellationRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[clap(rename_all = "kebab-case")]
pub enum WindowMode {
    /// The coming Saturday and the Sunday after it
    NextWeekend,
    /// Monday to Sunday of the current ISO week
    IsoWeek,
}

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn for_date(mode: WindowMode, today: NaiveDate) -> Self {
        let from_monday = i64::from(today.weekday().num_days_from_monday());
        match mode {
            WindowMode::NextWeekend => {
                // Saturday is day 5 counted from Monday.
                let start = today + Duration::days((5 - from_monday).rem_euclid(7));
                DateWindow {
                    start,
                    end: start + Duration::days(1),
                }
            }
            WindowMode::IsoWeek => {
                let start = today - Duration::days(from_monday);
                DateWindow {
                    start,
                    end: start + Duration::days(6),
                }
            }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

pub fn filter_to_window(
    records: Vec<CancellationRecord>,
    window: &DateWindow,
) -> Vec<CancellationRecord> {
    records
        .into_iter()
        .filter(|record| window.contains(record.date))
        .collect()
}
