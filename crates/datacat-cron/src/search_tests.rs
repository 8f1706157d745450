use super::*;

use std::str::FromStr;

use chrono::{Duration, Utc, Weekday};

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
}

fn next(expr: &str, from: NaiveDateTime) -> NaiveDateTime {
    CronExpression::parse(expr)
        .unwrap()
        .next_after(from, SearchHorizon::default())
        .unwrap()
}

#[test]
fn test_noon_daily() {
    assert_eq!(next("0 0 12 * * *", at(2024, 1, 1, 0, 0, 0)), at(2024, 1, 1, 12, 0, 0));
}

#[test]
fn test_reference_on_match_is_excluded() {
    assert_eq!(next("0 0 12 * * *", at(2024, 1, 1, 12, 0, 0)), at(2024, 1, 2, 12, 0, 0));
}

#[test]
fn test_every_second_drops_sub_second_precision() {
    let from = at(2024, 1, 1, 0, 0, 0) + Duration::milliseconds(500);
    assert_eq!(next("* * * * * *", from), at(2024, 1, 1, 0, 0, 1));
}

#[test]
fn test_five_field_expression_fires_at_second_zero() {
    assert_eq!(next("30 9 * * *", at(2024, 5, 10, 9, 30, 0)), at(2024, 5, 11, 9, 30, 0));
}

#[test]
fn test_year_rollover() {
    assert_eq!(next("0 0 0 1 1 *", at(2024, 12, 31, 23, 59, 59)), at(2025, 1, 1, 0, 0, 0));
}

#[test]
fn test_explicit_future_year() {
    assert_eq!(next("0 0 0 1 1 * 2026", at(2024, 6, 1, 0, 0, 0)), at(2026, 1, 1, 0, 0, 0));
}

#[test]
fn test_past_year_is_unsatisfiable() {
    let err = CronExpression::parse("0 0 0 1 1 * 2020")
        .unwrap()
        .next_after(at(2024, 6, 1, 0, 0, 0), SearchHorizon::default())
        .unwrap_err();
    assert!(err.is_unsatisfiable());
}

#[test]
fn test_february_thirtieth_is_unsatisfiable() {
    let err = CronExpression::parse("0 0 0 30 2 * *")
        .unwrap()
        .next_after(at(2024, 1, 1, 0, 0, 0), SearchHorizon::default())
        .unwrap_err();
    match err {
        CronError::Unsatisfiable { expression, horizon } => {
            assert_eq!(expression, "0 0 0 30 2 * *");
            assert_eq!(horizon, SearchHorizon::FIVE_YEARS);
        }
        e => panic!("Expected Unsatisfiable, got {:?}", e),
    }
}

#[test]
fn test_small_horizon_is_exhausted() {
    let err = CronExpression::parse("0 0 12 * * *")
        .unwrap()
        .next_after(at(2024, 1, 1, 0, 0, 0), SearchHorizon::iterations(3))
        .unwrap_err();
    assert!(err.is_unsatisfiable());
    assert!(err.to_string().contains("3 iterations"));
}

#[test]
fn test_empty_fields_fail_without_searching() {
    let from = at(2024, 1, 1, 0, 0, 0);
    for expr in ["60 * * * * *", "0 60 * * * *", "0 0 24 * * *", "0 0 0 * 13 *", "0 0 0 * * 7", "0 0 0 32 * *"] {
        let started = std::time::Instant::now();
        let err = CronExpression::parse(expr)
            .unwrap()
            .next_after(from, SearchHorizon::default())
            .unwrap_err();
        assert!(err.is_unsatisfiable(), "{}", expr);
        assert!(started.elapsed() < std::time::Duration::from_secs(1), "{} took {:?}", expr, started.elapsed());
    }
}

#[test]
fn test_upcoming_with_huge_count_stops_at_first_failure() {
    let runs = CronExpression::parse("0 0 0 1 1 * 2024")
        .unwrap()
        .upcoming(at(2023, 6, 1, 0, 0, 0), usize::MAX, SearchHorizon::default());
    let err = runs.unwrap_err();
    assert!(err.is_unsatisfiable());
}

#[test]
fn test_leap_day() {
    assert_eq!(next("0 0 0 29 2 *", at(2024, 3, 1, 0, 0, 0)), at(2028, 2, 29, 0, 0, 0));
}

#[test]
fn test_day_of_month_with_weekday_wildcard() {
    let expr = CronExpression::parse("0 0 8 15 * *").unwrap();
    let runs = expr
        .upcoming(at(2024, 1, 1, 0, 0, 0), 24, SearchHorizon::default())
        .unwrap();

    assert_eq!(runs.len(), 24);
    assert!(runs.iter().all(|r| r.day() == 15));

    let weekdays: std::collections::HashSet<Weekday> = runs.iter().map(|r| r.weekday()).collect();
    assert!(weekdays.len() > 1, "15th should land on several weekdays");
}

#[test]
fn test_weekday_with_day_of_month_wildcard() {
    // 2024-01-02 is a Tuesday, the next Monday is the 8th.
    assert_eq!(next("0 0 9 ? * MON", at(2024, 1, 2, 0, 0, 0)), at(2024, 1, 8, 9, 0, 0));
}

#[test]
fn test_day_of_month_and_weekday_both_required() {
    assert_eq!(next("0 0 0 13 * FRI", at(2024, 1, 1, 0, 0, 0)), at(2024, 9, 13, 0, 0, 0));
}

#[test]
fn test_upcoming_quarter_hours() {
    let expr = CronExpression::parse("0 */15 * * * *").unwrap();
    let runs = expr
        .upcoming(at(2024, 1, 1, 0, 0, 0), 4, SearchHorizon::default())
        .unwrap();
    assert_eq!(
        runs,
        vec![
            at(2024, 1, 1, 0, 15, 0),
            at(2024, 1, 1, 0, 30, 0),
            at(2024, 1, 1, 0, 45, 0),
            at(2024, 1, 1, 1, 0, 0),
        ]
    );
}

#[test]
fn test_next_from_result_is_later_and_matches() {
    let expressions = [
        "0 0 12 * * *",
        "*/20 5 */6 * * *",
        "0 30 9 * * MON-FRI",
        "0 0 0 15 * *",
        "15 10 4 * JAN,JUL *",
    ];
    let from = at(2024, 2, 28, 23, 59, 59);

    for source in expressions {
        let expr = CronExpression::parse(source).unwrap();
        let first = expr.next_after(from, SearchHorizon::default()).unwrap();
        let second = expr
            .next_after(first + Duration::seconds(1), SearchHorizon::default())
            .unwrap();

        assert!(second > first, "'{}': {} should follow {}", source, second, first);
        let schedule = expr.schedule_for(second.year()).unwrap();
        assert!(schedule.matches(second), "'{}' should match {}", source, second);
    }
}

#[test]
fn test_next_execution_defaults_to_now() {
    let before = Local::now().naive_local();
    let next = next_execution("* * * * * *", None).unwrap();
    assert!(next > before);
}

#[test]
fn test_next_execution_invalid_expression() {
    let err = next_execution("* * *", None).unwrap_err();
    assert!(err.is_invalid_expression());
}

#[test]
fn test_horizon_display_and_default() {
    assert_eq!(SearchHorizon::default(), SearchHorizon::FIVE_YEARS);
    assert_eq!(SearchHorizon::FIVE_YEARS.get(), 157_680_000);
    assert_eq!(SearchHorizon::iterations(42).to_string(), "42 iterations");
}

#[test]
fn test_agrees_with_cron_crate() {
    let expressions = [
        "0 */15 * * * *",
        "0 30 9 * * MON-FRI",
        "0 0 0 1 * *",
        "15 10 4 * JAN,JUL *",
        "0 0 12 * * SUN",
        "*/20 5 */6 * * *",
        "0 0 0 29 2 *",
    ];
    let references = [
        at(2024, 1, 1, 0, 0, 0),
        at(2024, 2, 28, 23, 59, 59),
        at(2024, 12, 31, 23, 59, 30),
    ];

    for source in expressions {
        let reference_schedule = cron::Schedule::from_str(source).unwrap();
        let expr = CronExpression::parse(source).unwrap();

        for from in references {
            let ours = expr.next_after(from, SearchHorizon::default()).unwrap();
            let theirs = reference_schedule
                .after(&from.and_utc())
                .next()
                .unwrap()
                .with_timezone(&Utc)
                .naive_utc();
            assert_eq!(ours, theirs, "'{}' from {}", source, from);
        }
    }
}
