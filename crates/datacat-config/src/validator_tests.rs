use super::*;

#[test]
fn test_validate_default_config() {
    let config = Config::default();
    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_validate_empty_database_path() {
    let mut config = Config::default();
    config.database.path = "  ".to_string();

    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "database.path"));
}

#[test]
fn test_validate_empty_path_allowed_in_memory() {
    let mut config = Config::default();
    config.database.path = String::new();
    config.database.in_memory = true;

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
}

#[test]
fn test_validate_zero_timeout() {
    let mut config = Config::default();
    config.link_check.timeout_seconds = 0;

    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "link_check.timeout_seconds"));
}

#[test]
fn test_validate_high_timeout_warning() {
    let mut config = Config::default();
    config.link_check.timeout_seconds = 600;

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "link_check.timeout_seconds"));
}

#[test]
fn test_validate_invalid_schedule() {
    let mut config = Config::default();
    config.link_check.schedules = vec![
        "0 0 3 * * * *".to_string(),
        "every day".to_string(),
        "0 0 x * *".to_string(),
    ];

    let result = ConfigValidator::validate(&config);
    assert_eq!(result.errors.len(), 2);
    assert_eq!(result.errors[0].path, "link_check.schedules[1]");
    assert_eq!(result.errors[1].path, "link_check.schedules[2]");
    assert!(result.errors[0].message.contains("fields"));
}

#[test]
fn test_validate_zero_horizon() {
    let mut config = Config::default();
    config.cron.horizon_iterations = 0;

    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "cron.horizon_iterations"));
}

#[test]
fn test_validate_unknown_log_level_warning() {
    let mut config = Config::default();
    config.logging.level = "verbose".to_string();

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "logging.level"));
}

#[test]
fn test_log_level_case_insensitive() {
    let mut config = Config::default();
    config.logging.level = "DEBUG".to_string();

    let result = ConfigValidator::validate(&config);
    assert!(result.warnings.is_empty());
}

#[test]
fn test_into_result() {
    let mut config = Config::default();
    config.link_check.timeout_seconds = 0;

    let err = ConfigValidator::validate(&config).into_result().unwrap_err();
    assert!(err.to_string().contains("link_check.timeout_seconds"));

    let warnings = ConfigValidator::validate(&Config::default()).into_result().unwrap();
    assert!(warnings.is_empty());
}

#[test]
fn test_issue_display() {
    let mut config = Config::default();
    config.cron.horizon_iterations = 0;

    let result = ConfigValidator::validate(&config);
    assert_eq!(
        result.errors[0].to_string(),
        "cron.horizon_iterations: horizon_iterations must be greater than 0"
    );
}
