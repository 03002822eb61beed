// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only audit log of assignment changes.
#[cfg(feature = "memory")]
mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;
#[cfg(test)]
mod tests;
mod traits;

#[cfg(feature = "memory")]
pub use memory::AuditLogMemoryStore;
pub use traits::{AuditLogStore, LogQuery};
