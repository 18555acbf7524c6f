//! calendar helpers and the backward-walking iterators used to split a
//! billing period into monthly windows and a window into single days.

use chrono::{Datelike, Duration, Months, NaiveDate};

/// first day of the month containing `date`
pub fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// last day of the month containing `date`
pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let first = first_day_of_month(date);
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// signed number of days from `from` to `to`
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// one calendar month inside a billing period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
}

impl MonthWindow {
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first_day: first_day_of_month(date),
            last_day: last_day_of_month(date),
        }
    }

    /// inclusive number of days in the window
    pub fn days(&self) -> i64 {
        days_between(self.first_day, self.last_day) + 1
    }

    /// the window of the preceding calendar month
    pub fn previous(&self) -> Option<Self> {
        self.first_day.pred_opt().map(MonthWindow::containing)
    }

    /// days of the window walked from the last day backwards, stopping at
    /// `floor` when it falls inside the window
    pub fn days_descending(&self, floor: NaiveDate) -> DescendingDays {
        DescendingDays::new(self.last_day, self.first_day.max(floor))
    }
}

/// walks a period backwards one calendar month at a time
#[derive(Debug, Clone)]
pub struct MonthWindows {
    next: Option<MonthWindow>,
    remaining: u32,
}

impl MonthWindows {
    /// `count` windows ending with the month that contains `period_end`
    pub fn new(period_end: NaiveDate, count: u32) -> Self {
        Self {
            next: Some(MonthWindow::containing(period_end)),
            remaining: count,
        }
    }
}

impl Iterator for MonthWindows {
    type Item = MonthWindow;

    fn next(&mut self) -> Option<MonthWindow> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next.take()?;
        self.remaining -= 1;
        self.next = current.previous();
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining as usize;
        (0, Some(n))
    }
}

/// every date from `from` down to `down_to` inclusive, most recent first
#[derive(Debug, Clone)]
pub struct DescendingDays {
    current: Option<NaiveDate>,
    down_to: NaiveDate,
}

impl DescendingDays {
    pub fn new(from: NaiveDate, down_to: NaiveDate) -> Self {
        Self {
            current: (from >= down_to).then_some(from),
            down_to,
        }
    }
}

impl Iterator for DescendingDays {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let date = self.current?;
        self.current = if date > self.down_to {
            date.checked_sub_signed(Duration::days(1))
        } else {
            None
        };
        Some(date)
    }
}
