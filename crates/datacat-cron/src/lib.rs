//! # datacat Cron
//!
//! Cron expression evaluator used by datacat schedules.
//!
//! Expressions may have 5, 6 or 7 space-separated fields. They are
//! normalized to the 7-field form
//! `second minute hour day_of_month month day_of_week year`:
//!
//! - 5 fields: `"0"` seconds are prepended and a `"*"` year is appended
//! - 6 fields: a `"*"` year is appended
//! - 7 fields: used as-is
//!
//! The evaluator is a pure function of an expression and a reference
//! instant. No state is shared between calls.
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use datacat_cron::{CronExpression, SearchHorizon};
//!
//! let expr: CronExpression = "0 0 12 * * *".parse().unwrap();
//! let from = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! let next = expr.next_after(from, SearchHorizon::default()).unwrap();
//! assert_eq!(next.to_string(), "2024-01-01 12:00:00");
//! ```

pub mod error;
pub mod expression;
pub mod field;
pub mod format;
pub mod presets;
pub mod search;

pub use error::{CronError, CronResult};
pub use expression::{CronExpression, Schedule, normalize};
pub use field::{CronField, FieldSet, parse_field};
pub use format::{next_run_human, schedule_human};
pub use search::{SearchHorizon, next_execution};
