//! Lazy occurrence enumeration for [`RecurrenceRule`].
//!
//! Enumeration works period by period: the cursor marks one frequency
//! period (hour, day, week, month), every filter-satisfying instant
//! inside that period is collected in ascending order, and the cursor
//! then steps by one frequency unit times the interval.
//!
//! `by_*` filters below the frequency granularity *expand*: a weekly
//! rule with two weekdays yields both days every week, a daily rule
//! with two hours yields two runs per day. Filters at or above the
//! granularity *limit*, discarding periods (or days) that fall outside
//! the set. Unconstrained fields take their value from the anchor
//! instant, so a rule without time-of-day filters preserves the
//! anchor's time of day.
//!
//! Termination (count/until) is applied per emitted instant, so a count
//! consumes expanded occurrences. A run of periods producing nothing is
//! capped so an unsatisfiable filter combination (e.g. February 30th)
//! ends enumeration instead of spinning.

use std::collections::VecDeque;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use tracing::warn;

use crate::end_criteria::EndCriteria;
use crate::frequency::Frequency;
use crate::rule::RecurrenceRule;

/// Consecutive empty periods allowed before the rule is treated as
/// unsatisfiable. At monthly granularity this covers roughly 800 years.
const MAX_EMPTY_PERIODS: usize = 10_000;

/// Iterator over the occurrence instants of a recurrence rule.
///
/// Strictly increasing; infinite unless the rule carries end criteria
/// or its filters are unsatisfiable.
pub struct Occurrences<'a> {
    rule: &'a RecurrenceRule,
    start_time: DateTime<Utc>,
    /// Time of day of the anchor; hour/minute are overridden per
    /// candidate, seconds (and finer) carry through unchanged.
    anchor_time: NaiveTime,
    /// Day-of-month of the anchor. A monthly rule without day filters
    /// runs on this day only; months too short for it are skipped.
    anchor_day: u32,
    /// Effective expansion sets, sorted and deduplicated. `hours` and
    /// `minutes` fall back to the anchor's value when the filter is
    /// empty; the others stay empty for "unconstrained".
    hours: Vec<u32>,
    minutes: Vec<u32>,
    monthdays: Vec<u32>,
    weekdays: Vec<chrono::Weekday>,
    cursor: DateTime<Utc>,
    pending: VecDeque<DateTime<Utc>>,
    interval: u32,
    emitted: u32,
    empty_periods: usize,
    done: bool,
}

impl<'a> Occurrences<'a> {
    pub(crate) fn new(rule: &'a RecurrenceRule, start_time: DateTime<Utc>) -> Self {
        // An unspecified frequency denotes "no recurrence" and an
        // UNSPECIFIED weekday filter is unsatisfiable; both enumerate
        // as empty.
        let done = !rule.is_recurring() || rule.has_unspecified_weekday();
        let hours = if rule.by_hour.is_empty() {
            vec![start_time.hour()]
        } else {
            sorted_set(&rule.by_hour)
        };
        let minutes = if rule.by_minute.is_empty() {
            vec![start_time.minute()]
        } else {
            sorted_set(&rule.by_minute)
        };
        let weekdays = rule
            .by_weekday
            .iter()
            .filter_map(|w| w.to_chrono())
            .collect();
        Self {
            rule,
            start_time,
            anchor_time: start_time.time(),
            anchor_day: start_time.day(),
            hours,
            minutes,
            monthdays: sorted_set(&rule.by_monthday),
            weekdays,
            cursor: start_time,
            pending: VecDeque::new(),
            interval: rule.interval.max(1),
            emitted: 0,
            empty_periods: 0,
            done,
        }
    }

    /// Collect every filter-satisfying instant inside the cursor's
    /// period, ascending, dropping anything before the anchor.
    fn fill_period(&mut self) {
        let mut found = Vec::new();
        match self.rule.frequency {
            Frequency::Hourly => {
                let date = self.cursor.date_naive();
                let hour = self.cursor.hour();
                if self.date_passes_limits(date) && field_matches(&self.rule.by_hour, hour as u8) {
                    for &minute in &self.minutes {
                        found.push(self.at(date, hour, minute));
                    }
                }
            }
            Frequency::Daily => {
                let date = self.cursor.date_naive();
                if self.date_passes_limits(date) {
                    self.times_on(date, &mut found);
                }
            }
            Frequency::Weekly => {
                let first = self.cursor.date_naive();
                for offset in 0..7 {
                    let date = first + Duration::days(offset);
                    // Without a weekday filter the rule runs once per
                    // week, on the anchor's weekday.
                    let selected = if self.weekdays.is_empty() {
                        offset == 0
                    } else {
                        self.weekdays.contains(&date.weekday())
                    };
                    if selected
                        && field_matches(&self.rule.by_month, date.month() as u8)
                        && field_matches(&self.rule.by_monthday, date.day() as u8)
                    {
                        self.times_on(date, &mut found);
                    }
                }
            }
            Frequency::Monthly => {
                let (year, month) = (self.cursor.year(), self.cursor.month());
                if field_matches(&self.rule.by_month, month as u8) {
                    for date in self.month_dates(year, month) {
                        self.times_on(date, &mut found);
                    }
                }
            }
            // `new` marks such iterators done before the first period.
            Frequency::Unspecified => {}
        }
        found.retain(|&t| t >= self.start_time);
        self.pending.extend(found);
    }

    /// Days of the given month a monthly rule runs on.
    ///
    /// A monthday filter expands to its in-range days; a weekday filter
    /// alone expands to every matching day of the month; together they
    /// intersect. With neither, the month runs on the anchor day only
    /// and months too short for it are skipped entirely.
    fn month_dates(&self, year: i32, month: u32) -> Vec<NaiveDate> {
        let len = days_in_month(year, month);
        let mut dates: Vec<NaiveDate> = if !self.monthdays.is_empty() {
            self.monthdays
                .iter()
                .filter_map(|&d| NaiveDate::from_ymd_opt(year, month, d))
                .collect()
        } else if !self.weekdays.is_empty() {
            (1..=len)
                .filter_map(|d| NaiveDate::from_ymd_opt(year, month, d))
                .collect()
        } else {
            NaiveDate::from_ymd_opt(year, month, self.anchor_day)
                .into_iter()
                .collect()
        };
        if !self.weekdays.is_empty() {
            dates.retain(|d| self.weekdays.contains(&d.weekday()));
        }
        dates
    }

    /// Month, monthday and weekday filters as limits on a single day,
    /// for frequencies at or below daily granularity.
    fn date_passes_limits(&self, date: NaiveDate) -> bool {
        field_matches(&self.rule.by_month, date.month() as u8)
            && field_matches(&self.rule.by_monthday, date.day() as u8)
            && (self.weekdays.is_empty() || self.weekdays.contains(&date.weekday()))
    }

    /// Expand the hour and minute sets on one day, ascending.
    fn times_on(&self, date: NaiveDate, out: &mut Vec<DateTime<Utc>>) {
        for &hour in &self.hours {
            for &minute in &self.minutes {
                out.push(self.at(date, hour, minute));
            }
        }
    }

    fn at(&self, date: NaiveDate, hour: u32, minute: u32) -> DateTime<Utc> {
        // Hour and minute are range-checked by construction, so the
        // fallback never triggers in practice.
        let time = self
            .anchor_time
            .with_hour(hour)
            .and_then(|t| t.with_minute(minute))
            .unwrap_or(self.anchor_time);
        Utc.from_utc_datetime(&date.and_time(time))
    }

    /// Step the cursor to the next period.
    fn advance_period(&mut self) {
        match self.rule.frequency {
            Frequency::Hourly => self.cursor += Duration::hours(self.interval as i64),
            Frequency::Daily => self.cursor += Duration::days(self.interval as i64),
            Frequency::Weekly => self.cursor += Duration::weeks(self.interval as i64),
            Frequency::Monthly => {
                let months =
                    self.cursor.year() * 12 + self.cursor.month0() as i32 + self.interval as i32;
                let year = months.div_euclid(12);
                let month = months.rem_euclid(12) as u32 + 1;
                // Anchoring on the 1st keeps the step valid in every
                // month; the days actually run come from `month_dates`.
                let date = NaiveDate::from_ymd_opt(year, month, 1)
                    .unwrap_or_else(|| self.cursor.date_naive());
                self.cursor = Utc.from_utc_datetime(&date.and_time(self.anchor_time));
            }
            Frequency::Unspecified => self.done = true,
        }
    }
}

impl Iterator for Occurrences<'_> {
    type Item = DateTime<Utc>;

    fn next(&mut self) -> Option<DateTime<Utc>> {
        loop {
            if self.done {
                return None;
            }

            if let Some(occurrence) = self.pending.pop_front() {
                match self.rule.end_criteria {
                    Some(EndCriteria::Count(count)) if self.emitted >= count => {
                        self.done = true;
                        return None;
                    }
                    Some(EndCriteria::Until(until)) if occurrence >= until => {
                        self.done = true;
                        return None;
                    }
                    _ => {}
                }
                self.emitted += 1;
                return Some(occurrence);
            }

            if self.empty_periods >= MAX_EMPTY_PERIODS {
                warn!(
                    frequency = %self.rule.frequency,
                    "recurrence filters unsatisfiable within search window; ending enumeration"
                );
                self.done = true;
                return None;
            }
            self.fill_period();
            self.empty_periods = if self.pending.is_empty() {
                self.empty_periods + 1
            } else {
                0
            };
            self.advance_period();
        }
    }
}

fn field_matches(filter: &[u8], value: u8) -> bool {
    filter.is_empty() || filter.contains(&value)
}

fn sorted_set(values: &[u8]) -> Vec<u32> {
    let mut set: Vec<u32> = values.iter().map(|&v| v as u32).collect();
    set.sort_unstable();
    set.dedup();
    set
}

fn days_in_month(year: i32, month: u32) -> u32 {
    // The 1st of the following month, minus one day.
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}
