//! Cron field grammar.
//!
//! Each field is parsed on its own into the concrete set of values it
//! allows. Supported syntax, with comma-separated alternatives unioned:
//!
//! - `*`, `?` or an empty field: the full range
//! - `a-b`: inclusive range
//! - `a-b/s`, `*/s`: stepped range starting at `a` (or the range minimum)
//! - `n`: a single value
//! - `JAN`..`DEC` and `SUN`..`SAT` (any case) in place of numbers
//!
//! Values outside the field range are dropped.

use std::collections::BTreeSet;
use std::fmt;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::error::{CronError, CronResult};

/// Month names and their numbers.
pub const MONTH_NAMES: [(&str, u32); 12] = [
    ("JAN", 1),
    ("FEB", 2),
    ("MAR", 3),
    ("APR", 4),
    ("MAY", 5),
    ("JUN", 6),
    ("JUL", 7),
    ("AUG", 8),
    ("SEP", 9),
    ("OCT", 10),
    ("NOV", 11),
    ("DEC", 12),
];

/// Day names and their numbers (Sunday is 0).
pub const DAY_NAMES: [(&str, u32); 7] = [
    ("SUN", 0),
    ("MON", 1),
    ("TUE", 2),
    ("WED", 3),
    ("THU", 4),
    ("FRI", 5),
    ("SAT", 6),
];

static NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let names: Vec<&str> = MONTH_NAMES
        .iter()
        .chain(DAY_NAMES.iter())
        .map(|(name, _)| *name)
        .collect();
    Regex::new(&format!(r"(?i)\b({})\b", names.join("|"))).expect("name pattern is valid")
});

/// A position in the normalized 7-field expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CronField {
    Second,
    Minute,
    Hour,
    DayOfMonth,
    Month,
    DayOfWeek,
    Year,
}

impl CronField {
    /// All fields in expression order.
    pub const ALL: [CronField; 7] = [
        CronField::Second,
        CronField::Minute,
        CronField::Hour,
        CronField::DayOfMonth,
        CronField::Month,
        CronField::DayOfWeek,
        CronField::Year,
    ];

    /// Human-readable field name.
    pub fn name(self) -> &'static str {
        match self {
            CronField::Second => "second",
            CronField::Minute => "minute",
            CronField::Hour => "hour",
            CronField::DayOfMonth => "day-of-month",
            CronField::Month => "month",
            CronField::DayOfWeek => "day-of-week",
            CronField::Year => "year",
        }
    }

    /// Inclusive value range of the field.
    ///
    /// The year range spans ten years from `reference_year`.
    pub fn bounds(self, reference_year: i32) -> (u32, u32) {
        match self {
            CronField::Second | CronField::Minute => (0, 59),
            CronField::Hour => (0, 23),
            CronField::DayOfMonth => (1, 31),
            CronField::Month => (1, 12),
            CronField::DayOfWeek => (0, 6),
            CronField::Year => {
                let start = u32::try_from(reference_year).unwrap_or(0);
                (start, start.saturating_add(10))
            }
        }
    }
}

impl fmt::Display for CronField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The parsed set of values allowed by one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSet {
    values: BTreeSet<u32>,
    wildcard: bool,
}

impl FieldSet {
    /// Every value in `min..=max`, marked as a wildcard.
    pub fn full(min: u32, max: u32) -> Self {
        Self {
            values: (min..=max).collect(),
            wildcard: true,
        }
    }

    /// Parse `raw` for `field`, using the field's bounds for `reference_year`.
    pub fn parse(raw: &str, field: CronField, reference_year: i32) -> CronResult<Self> {
        let (min, max) = field.bounds(reference_year);
        parse_field(raw, field, min, max)
    }

    pub fn contains(&self, value: u32) -> bool {
        self.values.contains(&value)
    }

    /// Whether the raw field was `*`, `?` or empty.
    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn max(&self) -> Option<u32> {
        self.values.last().copied()
    }

    /// Values in ascending order.
    pub fn values(&self) -> impl Iterator<Item = u32> + '_ {
        self.values.iter().copied()
    }
}

/// Whether a raw field selects its whole range.
pub fn is_wildcard(raw: &str) -> bool {
    matches!(raw, "*" | "?" | "")
}

/// Replace month and day names with their numbers.
pub fn replace_names(raw: &str) -> String {
    NAME_PATTERN
        .replace_all(raw, |caps: &Captures| {
            let name = caps[1].to_ascii_uppercase();
            MONTH_NAMES
                .iter()
                .chain(DAY_NAMES.iter())
                .find(|(candidate, _)| *candidate == name)
                .map(|(_, number)| number.to_string())
                .unwrap_or(name)
        })
        .into_owned()
}

/// Parse one raw field into the set of values it allows within `min..=max`.
///
/// # Errors
///
/// Returns [`CronError::InvalidToken`] for non-numeric tokens, malformed
/// ranges and zero steps.
pub fn parse_field(raw: &str, field: CronField, min: u32, max: u32) -> CronResult<FieldSet> {
    if is_wildcard(raw) {
        return Ok(FieldSet::full(min, max));
    }

    let substituted = replace_names(raw);
    let mut values = BTreeSet::new();

    for part in substituted.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        if let Some((range_part, step_part)) = part.split_once('/') {
            let step = parse_step(field, step_part)?;
            let (start, end) = match range_part {
                "*" | "?" => (min, max),
                _ => match range_part.split_once('-') {
                    Some((start, end)) => (parse_value(field, start)?, parse_value(field, end)?),
                    None => {
                        // `a/s` selects `a` alone.
                        let value = parse_value(field, range_part)?;
                        if (min..=max).contains(&value) {
                            values.insert(value);
                        }
                        continue;
                    }
                },
            };
            values.extend(stepped(start, end, step, min, max));
        } else if let Some((start, end)) = part.split_once('-') {
            let start = parse_value(field, start)?;
            let end = parse_value(field, end)?;
            values.extend(stepped(start, end, 1, min, max));
        } else {
            let value = parse_value(field, part)?;
            if (min..=max).contains(&value) {
                values.insert(value);
            }
        }
    }

    Ok(FieldSet {
        values,
        wildcard: false,
    })
}

fn parse_value(field: CronField, token: &str) -> CronResult<u32> {
    token
        .trim()
        .parse::<u32>()
        .map_err(|e| CronError::InvalidToken {
            field,
            token: token.to_string(),
            reason: e.to_string(),
        })
}

fn parse_step(field: CronField, token: &str) -> CronResult<u32> {
    let step = parse_value(field, token)?;
    if step == 0 {
        return Err(CronError::InvalidToken {
            field,
            token: token.to_string(),
            reason: "step must be greater than 0".to_string(),
        });
    }
    Ok(step)
}

/// `start, start + step, ..` up to `end`, keeping only values in `min..=max`.
fn stepped(start: u32, end: u32, step: u32, min: u32, max: u32) -> impl Iterator<Item = u32> {
    let step = u64::from(step);
    let (start, end) = (u64::from(start), u64::from(end).min(u64::from(max)));
    let min = u64::from(min);

    // First value of the progression that is not below `min`.
    let first = if start >= min {
        start
    } else {
        start + (min - start).div_ceil(step) * step
    };

    (0u64..)
        .map(move |i| first + i * step)
        .take_while(move |value| *value <= end)
        .filter_map(|value| u32::try_from(value).ok())
}

#[cfg(test)]
#[path = "field_tests.rs"]
mod tests;
