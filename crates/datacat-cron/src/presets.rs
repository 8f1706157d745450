//! Common cron schedule presets, in 6-field form.

/// Every minute.
pub const EVERY_MINUTE: &str = "0 * * * * *";

/// Every 5 minutes.
pub const EVERY_5_MINUTES: &str = "0 */5 * * * *";

/// Every 15 minutes.
pub const EVERY_15_MINUTES: &str = "0 */15 * * * *";

/// Every hour.
pub const EVERY_HOUR: &str = "0 0 * * * *";

/// Every day at midnight.
pub const DAILY_MIDNIGHT: &str = "0 0 0 * * *";

/// Every day at noon.
pub const DAILY_NOON: &str = "0 0 12 * * *";

/// Every Monday at 9 AM.
pub const WEEKLY_MONDAY_9AM: &str = "0 0 9 * * MON";

/// First day of each month at midnight.
pub const MONTHLY_FIRST: &str = "0 0 0 1 * *";

/// Expression firing every `minutes` minutes.
pub fn every_minutes(minutes: u32) -> String {
    format!("0 */{} * * * *", minutes)
}

/// Expression firing every `hours` hours.
pub fn every_hours(hours: u32) -> String {
    format!("0 0 */{} * * *", hours)
}

/// Expression firing daily at `hour:minute`.
pub fn daily_at(hour: u32, minute: u32) -> String {
    format!("0 {} {} * * *", minute, hour)
}
