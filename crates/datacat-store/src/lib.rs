//! # datacat Store
//!
//! Persistence for the data catalog:
//!
//! - [`TotalData`] records keyed by their SHA-256 [`hash_address`], written
//!   with update-or-create semantics
//! - [`Link`]s whose reachability is checked on a schedule
//! - [`LinkCheckSchedule`]s holding the cron expressions of those checks
//!
//! Two backends implement the store traits: [`MemoryStore`] and
//! [`SqliteStore`].

pub mod error;
pub mod hash;
pub mod memory;
pub mod model;
mod schema;
pub mod sqlite;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use hash::hash_address;
pub use memory::MemoryStore;
pub use model::{
    CatalogRecord, HASH_KEY_FIELDS, Link, LinkCheck, LinkCheckSchedule, NewLink, TotalData,
    UpsertOutcome,
};
pub use sqlite::SqliteStore;
pub use store::{CatalogStore, LinkStore, ScheduleStore};
