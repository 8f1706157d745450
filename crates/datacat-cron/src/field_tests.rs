use super::*;

fn values(set: &FieldSet) -> Vec<u32> {
    set.values().collect()
}

#[test]
fn test_wildcards_cover_full_range() {
    for raw in ["*", "?", ""] {
        let set = parse_field(raw, CronField::Hour, 0, 23).unwrap();
        assert!(set.is_wildcard());
        assert_eq!(set.len(), 24);
        assert!(set.contains(0));
        assert!(set.contains(23));
    }
}

#[test]
fn test_step_over_full_range() {
    let set = parse_field("*/15", CronField::Minute, 0, 59).unwrap();
    assert_eq!(values(&set), vec![0, 15, 30, 45]);
    assert!(!set.is_wildcard());
}

#[test]
fn test_stepped_range() {
    let set = parse_field("10-30/10", CronField::Second, 0, 59).unwrap();
    assert_eq!(values(&set), vec![10, 20, 30]);
}

#[test]
fn test_inclusive_range() {
    let set = parse_field("1-5", CronField::DayOfWeek, 0, 6).unwrap();
    assert_eq!(values(&set), vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_day_names() {
    let set = parse_field("MON,WED,FRI", CronField::DayOfWeek, 0, 6).unwrap();
    assert_eq!(values(&set), vec![1, 3, 5]);
}

#[test]
fn test_names_are_case_insensitive() {
    let set = parse_field("jan,Jul,DEC", CronField::Month, 1, 12).unwrap();
    assert_eq!(values(&set), vec![1, 7, 12]);

    let set = parse_field("mon-fri", CronField::DayOfWeek, 0, 6).unwrap();
    assert_eq!(values(&set), vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_replace_names_whole_words_only() {
    assert_eq!(replace_names("SUN,SAT"), "0,6");
    assert_eq!(replace_names("JANUARY"), "JANUARY");
}

#[test]
fn test_list_union_and_dedup() {
    let set = parse_field("5,1-3,2", CronField::Hour, 0, 23).unwrap();
    assert_eq!(values(&set), vec![1, 2, 3, 5]);
}

#[test]
fn test_out_of_range_values_dropped() {
    let set = parse_field("0,31,32", CronField::DayOfMonth, 1, 31).unwrap();
    assert_eq!(values(&set), vec![31]);

    let set = parse_field("50-70", CronField::Minute, 0, 59).unwrap();
    assert_eq!(values(&set), (50..=59).collect::<Vec<_>>());
}

#[test]
fn test_single_value_with_step() {
    let set = parse_field("5/10", CronField::Minute, 0, 59).unwrap();
    assert_eq!(values(&set), vec![5]);
}

#[test]
fn test_empty_alternatives_skipped() {
    let set = parse_field("1,,2,", CronField::Hour, 0, 23).unwrap();
    assert_eq!(values(&set), vec![1, 2]);
}

#[test]
fn test_step_below_min_aligns_to_progression() {
    // 0, 7, 14, ... starting below the day-of-month minimum of 1.
    let set = parse_field("0-20/7", CronField::DayOfMonth, 1, 31).unwrap();
    assert_eq!(values(&set), vec![7, 14]);
}

#[test]
fn test_reversed_range_is_empty() {
    let set = parse_field("10-5", CronField::Hour, 0, 23).unwrap();
    assert!(set.is_empty());
}

#[test]
fn test_invalid_token() {
    let err = parse_field("abc", CronField::Minute, 0, 59).unwrap_err();
    match err {
        CronError::InvalidToken { field, token, .. } => {
            assert_eq!(field, CronField::Minute);
            assert_eq!(token, "abc");
        }
        e => panic!("Expected InvalidToken, got {:?}", e),
    }
}

#[test]
fn test_zero_step_rejected() {
    let err = parse_field("*/0", CronField::Minute, 0, 59).unwrap_err();
    assert!(err.is_invalid_expression());
    assert!(err.to_string().contains("step"));
}

#[test]
fn test_malformed_ranges_rejected() {
    for raw in ["1-", "-5", "1-2-3", "*/5/2", "/5", "L", "5#2"] {
        let result = parse_field(raw, CronField::Hour, 0, 23);
        assert!(result.is_err(), "expected '{}' to be rejected", raw);
    }
}

#[test]
fn test_year_bounds() {
    assert_eq!(CronField::Year.bounds(2024), (2024, 2034));
    let set = FieldSet::parse("*", CronField::Year, 2024).unwrap();
    assert_eq!(set.len(), 11);
    assert_eq!(set.max(), Some(2034));

    let set = FieldSet::parse("2020,2025,2040", CronField::Year, 2024).unwrap();
    assert_eq!(values(&set), vec![2025]);
}

#[test]
fn test_field_display() {
    assert_eq!(CronField::DayOfMonth.to_string(), "day-of-month");
    assert_eq!(CronField::ALL.len(), 7);
}
