//! # datacat Link Check
//!
//! Periodic reachability checks for catalog links.
//!
//! - [`HttpProbe`] issues a `HEAD` request per URL
//! - [`LinkChecker`] walks all active links and records each outcome
//! - [`LinkCheckScheduler`] fires the checker on the cron schedules held
//!   in a [`ScheduleStore`](datacat_store::ScheduleStore)

pub mod checker;
pub mod error;
pub mod probe;
pub mod scheduler;

pub use checker::{CheckSummary, LinkChecker, is_link_active};
pub use error::{LinkCheckError, ProbeError};
pub use probe::{DEFAULT_ACCEPT, HttpProbe, LinkProbe, ProbeConfig};
pub use scheduler::{LinkCheckScheduler, ScheduledJob};
