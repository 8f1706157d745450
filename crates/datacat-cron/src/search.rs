//! Next-occurrence search.

use std::fmt;

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use tracing::debug;

use crate::error::{CronError, CronResult};
use crate::expression::{CronExpression, Schedule};

/// Upper bound on search iterations.
///
/// Every iteration either jumps to the next candidate boundary or advances
/// one second, so the bound also caps the work spent on expressions that
/// never match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SearchHorizon {
    iterations: u64,
}

impl SearchHorizon {
    /// Five years' worth of seconds.
    pub const FIVE_YEARS: SearchHorizon = SearchHorizon::iterations(60 * 60 * 24 * 365 * 5);

    pub const fn iterations(iterations: u64) -> Self {
        Self { iterations }
    }

    pub fn get(&self) -> u64 {
        self.iterations
    }
}

impl Default for SearchHorizon {
    fn default() -> Self {
        Self::FIVE_YEARS
    }
}

impl fmt::Display for SearchHorizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} iterations", self.iterations)
    }
}

impl CronExpression {
    /// First instant strictly after `reference` that satisfies the expression.
    ///
    /// Sub-second precision of `reference` is discarded.
    ///
    /// # Errors
    ///
    /// Returns [`CronError::Unsatisfiable`] when nothing matches within the
    /// year range or the horizon.
    pub fn next_after(
        &self,
        reference: NaiveDateTime,
        horizon: SearchHorizon,
    ) -> CronResult<NaiveDateTime> {
        let schedule = self.schedule_for(reference.year())?;

        match schedule.next_after(reference, horizon) {
            Some(next) => {
                debug!(expression = %self.source(), %reference, %next, "cron next occurrence");
                Ok(next)
            }
            None => Err(CronError::Unsatisfiable {
                expression: self.source().to_string(),
                horizon,
            }),
        }
    }

    /// The next `count` occurrences, each searched from the previous one.
    pub fn upcoming(
        &self,
        reference: NaiveDateTime,
        count: usize,
        horizon: SearchHorizon,
    ) -> CronResult<Vec<NaiveDateTime>> {
        let mut result = Vec::new();
        let mut from = reference;
        for _ in 0..count {
            let next = self.next_after(from, horizon)?;
            result.push(next);
            from = next;
        }
        Ok(result)
    }
}

impl Schedule {
    /// Walk forward from `reference + 1s`, fixing the coarsest mismatching
    /// field first.
    ///
    /// Returns `None` when the horizon is exhausted or the walk passes the
    /// last allowed year, and at once when some field can never match.
    pub fn next_after(&self, reference: NaiveDateTime, horizon: SearchHorizon) -> Option<NaiveDateTime> {
        if !self.can_match() {
            return None;
        }
        let last_year = self.years.max()?;
        let mut current = reference.with_nanosecond(0)?.checked_add_signed(TimeDelta::seconds(1))?;

        for _ in 0..horizon.get() {
            let year = u32::try_from(current.year()).ok()?;
            if year > last_year {
                return None;
            }

            if !self.years.contains(year) {
                current = midnight(NaiveDate::from_ymd_opt(current.year() + 1, 1, 1)?)?;
                continue;
            }

            if !self.months.contains(current.month()) {
                current = midnight(first_of_next_month(current.date())?)?;
                continue;
            }

            if !self.day_matches(current.date()) {
                current = midnight(current.date().succ_opt()?)?;
                continue;
            }

            if !self.hours.contains(current.hour()) {
                current = current
                    .with_minute(0)?
                    .with_second(0)?
                    .checked_add_signed(TimeDelta::hours(1))?;
                continue;
            }

            if !self.minutes.contains(current.minute()) {
                current = current
                    .with_second(0)?
                    .checked_add_signed(TimeDelta::minutes(1))?;
                continue;
            }

            if !self.seconds.contains(current.second()) {
                current = current.checked_add_signed(TimeDelta::seconds(1))?;
                continue;
            }

            return Some(current);
        }

        None
    }
}

fn midnight(date: NaiveDate) -> Option<NaiveDateTime> {
    date.and_hms_opt(0, 0, 0)
}

fn first_of_next_month(date: NaiveDate) -> Option<NaiveDate> {
    if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    }
}

/// Next execution of `expr` after `from`, or after the local current time.
pub fn next_execution(expr: &str, from: Option<NaiveDateTime>) -> CronResult<NaiveDateTime> {
    let from = from.unwrap_or_else(|| Local::now().naive_local());
    CronExpression::parse(expr)?.next_after(from, SearchHorizon::default())
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
