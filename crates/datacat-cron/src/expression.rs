//! Expression normalization and resolved schedules.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::error::{CronError, CronResult};
use crate::field::{CronField, FieldSet};

/// Reference year used to validate the year field at parse time.
///
/// Year bounds only filter values, so any year exposes the same token errors.
const VALIDATION_YEAR: i32 = 2000;

/// Normalize an expression to its seven raw fields.
///
/// # Errors
///
/// Returns [`CronError::InvalidExpression`] unless the expression has
/// 5, 6 or 7 whitespace-separated fields.
pub fn normalize(expr: &str) -> CronResult<[String; 7]> {
    let parts: Vec<&str> = expr.split_whitespace().collect();

    let fields: Vec<String> = match parts.len() {
        5 => std::iter::once("0")
            .chain(parts.iter().copied())
            .chain(std::iter::once("*"))
            .map(str::to_string)
            .collect(),
        6 => parts
            .iter()
            .copied()
            .chain(std::iter::once("*"))
            .map(str::to_string)
            .collect(),
        7 => parts.iter().map(|p| p.to_string()).collect(),
        n => {
            return Err(CronError::InvalidExpression {
                expression: expr.to_string(),
                reason: format!("expected 5, 6 or 7 fields, got {}", n),
            });
        }
    };

    fields
        .try_into()
        .map_err(|_| CronError::InvalidExpression {
            expression: expr.to_string(),
            reason: "normalization produced a wrong field count".to_string(),
        })
}

/// A parsed cron expression in 7-field form.
///
/// All fields are validated on construction. Field sets are resolved per
/// reference year with [`CronExpression::schedule_for`] since the year range
/// depends on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronExpression {
    source: String,
    fields: [String; 7],
}

impl CronExpression {
    /// Parse and validate an expression.
    pub fn parse(expr: &str) -> CronResult<Self> {
        let fields = normalize(expr)?;
        Schedule::resolve(&fields, VALIDATION_YEAR)?;
        Ok(Self {
            source: expr.trim().to_string(),
            fields,
        })
    }

    /// The expression as given by the caller, trimmed.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The seven normalized raw fields.
    pub fn fields(&self) -> &[String; 7] {
        &self.fields
    }

    /// Raw text of one field.
    pub fn field(&self, field: CronField) -> &str {
        &self.fields[field_index(field)]
    }

    /// Resolve all field sets for a reference year.
    pub fn schedule_for(&self, reference_year: i32) -> CronResult<Schedule> {
        Schedule::resolve(&self.fields, reference_year)
    }
}

impl FromStr for CronExpression {
    type Err = CronError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CronExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fields.join(" "))
    }
}

fn field_index(field: CronField) -> usize {
    match field {
        CronField::Second => 0,
        CronField::Minute => 1,
        CronField::Hour => 2,
        CronField::DayOfMonth => 3,
        CronField::Month => 4,
        CronField::DayOfWeek => 5,
        CronField::Year => 6,
    }
}

/// Concrete value sets of an expression for one reference year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub seconds: FieldSet,
    pub minutes: FieldSet,
    pub hours: FieldSet,
    pub days_of_month: FieldSet,
    pub months: FieldSet,
    pub days_of_week: FieldSet,
    pub years: FieldSet,
}

impl Schedule {
    /// Parse every field of a normalized expression.
    pub fn resolve(fields: &[String; 7], reference_year: i32) -> CronResult<Self> {
        let parse = |field: CronField| FieldSet::parse(&fields[field_index(field)], field, reference_year);

        Ok(Self {
            seconds: parse(CronField::Second)?,
            minutes: parse(CronField::Minute)?,
            hours: parse(CronField::Hour)?,
            days_of_month: parse(CronField::DayOfMonth)?,
            months: parse(CronField::Month)?,
            days_of_week: parse(CronField::DayOfWeek)?,
            years: parse(CronField::Year)?,
        })
    }

    /// Day-of-month / day-of-week rule.
    ///
    /// - both wildcards: either set may contain the day (always true)
    /// - one wildcard: only the other field decides
    /// - no wildcard: both fields must contain the day
    pub fn day_matches(&self, date: NaiveDate) -> bool {
        let dom = self.days_of_month.contains(date.day());
        let dow = self.days_of_week.contains(date.weekday().num_days_from_sunday());

        match (
            self.days_of_month.is_wildcard(),
            self.days_of_week.is_wildcard(),
        ) {
            (true, true) => dom || dow,
            (true, false) => dow,
            (false, true) => dom,
            (false, false) => dom && dow,
        }
    }

    /// Whether every field that has to match can accept some value.
    ///
    /// Out-of-range values are dropped while parsing, so a field like `60`
    /// in the seconds position resolves to an empty set.
    pub fn can_match(&self) -> bool {
        let days = match (
            self.days_of_month.is_wildcard(),
            self.days_of_week.is_wildcard(),
        ) {
            (true, true) => true,
            (true, false) => !self.days_of_week.is_empty(),
            (false, true) => !self.days_of_month.is_empty(),
            (false, false) => !self.days_of_month.is_empty() && !self.days_of_week.is_empty(),
        };

        days && [&self.seconds, &self.minutes, &self.hours, &self.months, &self.years]
            .iter()
            .all(|set| !set.is_empty())
    }

    /// Whether all seven fields accept `instant`.
    pub fn matches(&self, instant: NaiveDateTime) -> bool {
        u32::try_from(instant.year()).is_ok_and(|year| self.years.contains(year))
            && self.months.contains(instant.month())
            && self.day_matches(instant.date())
            && self.hours.contains(instant.hour())
            && self.minutes.contains(instant.minute())
            && self.seconds.contains(instant.second())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_normalize_five_fields() {
        let fields = normalize("*/5 * * * MON").unwrap();
        assert_eq!(fields[0], "0");
        assert_eq!(fields[1], "*/5");
        assert_eq!(fields[5], "MON");
        assert_eq!(fields[6], "*");
    }

    #[test]
    fn test_normalize_five_field_property() {
        for expr in ["* * * * *", "0 12 * * *", "1,2 3-4 */2 JAN SUN"] {
            let fields = normalize(expr).unwrap();
            assert_eq!(fields[0], "0", "seconds of '{}'", expr);
            assert_eq!(fields[6], "*", "year of '{}'", expr);
        }
    }

    #[test]
    fn test_normalize_six_and_seven_fields() {
        let fields = normalize("30 0 12 * * *").unwrap();
        assert_eq!(fields[0], "30");
        assert_eq!(fields[6], "*");

        let fields = normalize("0 0 0 1 1 * 2030").unwrap();
        assert_eq!(fields[6], "2030");
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        let fields = normalize("  0   0\t12 *  * *  ").unwrap();
        assert_eq!(fields.join(" "), "0 0 12 * * * *");
    }

    #[test]
    fn test_normalize_wrong_field_count() {
        for expr in ["", "* * * *", "* * * * * * * *"] {
            let err = normalize(expr).unwrap_err();
            assert!(
                matches!(err, CronError::InvalidExpression { .. }),
                "expected InvalidExpression for '{}'",
                expr
            );
        }
    }

    #[test]
    fn test_parse_rejects_bad_tokens() {
        for expr in ["0 0 x * * *", "0 0 0 1 1 * twenty", "*/0 * * * *", "1 2 3"] {
            let err = CronExpression::parse(expr).unwrap_err();
            assert!(err.is_invalid_expression(), "{}", expr);
            assert!(!err.is_unsatisfiable(), "{}", expr);
        }
    }

    #[test]
    fn test_display_is_normalized() {
        let expr: CronExpression = "0 12 * * *".parse().unwrap();
        assert_eq!(expr.to_string(), "0 0 12 * * * *");
        assert_eq!(expr.source(), "0 12 * * *");
        assert_eq!(expr.field(CronField::Hour), "12");
    }

    #[test]
    fn test_day_matches_both_wildcards() {
        let expr = CronExpression::parse("0 0 0 * * *").unwrap();
        let schedule = expr.schedule_for(2024).unwrap();
        assert!(schedule.day_matches(date(2024, 2, 29)));
        assert!(schedule.day_matches(date(2024, 7, 14)));
    }

    #[test]
    fn test_day_matches_day_of_month_only() {
        let schedule = CronExpression::parse("0 0 0 15 * *")
            .unwrap()
            .schedule_for(2024)
            .unwrap();
        assert!(schedule.day_matches(date(2024, 1, 15)));
        assert!(schedule.day_matches(date(2024, 6, 15)));
        assert!(!schedule.day_matches(date(2024, 1, 16)));
    }

    #[test]
    fn test_day_matches_day_of_week_only() {
        // 2024-01-01 is a Monday.
        let schedule = CronExpression::parse("0 0 0 ? * MON")
            .unwrap()
            .schedule_for(2024)
            .unwrap();
        assert!(schedule.day_matches(date(2024, 1, 1)));
        assert!(schedule.day_matches(date(2024, 1, 8)));
        assert!(!schedule.day_matches(date(2024, 1, 2)));
    }

    #[test]
    fn test_day_matches_requires_both_when_restricted() {
        // Friday the 13th: 2024-09-13.
        let schedule = CronExpression::parse("0 0 0 13 * FRI")
            .unwrap()
            .schedule_for(2024)
            .unwrap();
        assert!(schedule.day_matches(date(2024, 9, 13)));
        assert!(!schedule.day_matches(date(2024, 8, 13)));
        assert!(!schedule.day_matches(date(2024, 9, 6)));
    }

    #[test]
    fn test_can_match() {
        let schedule = |expr: &str| CronExpression::parse(expr).unwrap().schedule_for(2024).unwrap();

        assert!(schedule("0 0 12 * * *").can_match());
        assert!(schedule("0 0 0 30 2 *").can_match());
        assert!(!schedule("60 * * * * *").can_match());
        assert!(!schedule("0 0 0 * * 7").can_match());
        assert!(!schedule("0 0 0 32 * *").can_match());
        assert!(!schedule("0 0 0 32 * MON").can_match());
        assert!(!schedule("0 0 0 * * * 1999").can_match());
    }

    #[test]
    fn test_matches_instant() {
        let schedule = CronExpression::parse("30 15 10 * * *")
            .unwrap()
            .schedule_for(2024)
            .unwrap();
        let hit = date(2024, 3, 1).and_hms_opt(10, 15, 30).unwrap();
        let miss = date(2024, 3, 1).and_hms_opt(10, 15, 31).unwrap();
        assert!(schedule.matches(hit));
        assert!(!schedule.matches(miss));
    }
}
