//! Display helpers for schedules.

use chrono::NaiveDateTime;

use crate::search::next_execution;

/// Format used to show run times next to schedules.
pub const HUMAN_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Format an instant as `DD.MM.YYYY HH:MM:SS`.
pub fn schedule_human(instant: NaiveDateTime) -> String {
    instant.format(HUMAN_FORMAT).to_string()
}

/// Human-readable next run of `expr`, or `None` if it cannot be computed.
pub fn next_run_human(expr: &str, from: Option<NaiveDateTime>) -> Option<String> {
    next_execution(expr, from).ok().map(schedule_human)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_schedule_human() {
        assert_eq!(schedule_human(at(2024, 3, 7, 9, 5, 1)), "07.03.2024 09:05:01");
    }

    #[test]
    fn test_next_run_human() {
        let from = at(2024, 1, 1, 0, 0, 0);
        assert_eq!(
            next_run_human("0 38 22 ? * FRI", Some(from)).as_deref(),
            Some("05.01.2024 22:38:00")
        );
    }

    #[test]
    fn test_next_run_human_swallows_errors() {
        let from = at(2024, 1, 1, 0, 0, 0);
        assert_eq!(next_run_human("not a cron", Some(from)), None);
        assert_eq!(next_run_human("0 0 0 30 2 * *", Some(from)), None);
    }
}
