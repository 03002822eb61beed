// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage interfaces and backends for staff, software, match rules, assignment edges and the
//! assignment audit log.
//!
//! Every record family has its own trait, for example [`StaffStore`] or [`AssignmentStore`]. Two
//! backends implement all of them: [`MemoryStore`](memory::MemoryStore) for tests and
//! development, and [`SqliteStore`](sqlite::SqliteStore) for persistent storage.
//!
//! No method in these traits enforces relations between record families. Keeping at most one
//! assignment edge per staff member and software, or removing edges before their software, is
//! the job of the callers.
pub mod assignments;
pub mod logs;
pub mod matches;
#[cfg(feature = "memory")]
pub mod memory;
pub mod software;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod staff;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
mod traits;
pub mod units;

pub use assignments::AssignmentStore;
pub use logs::{AuditLogStore, LogQuery};
pub use matches::MatchStore;
#[cfg(feature = "memory")]
pub use memory::MemoryStore;
pub use software::SoftwareStore;
#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteError, SqliteStore, SqliteStoreBuilder};
pub use staff::StaffStore;
pub use traits::Transaction;
pub use units::UnitStore;
