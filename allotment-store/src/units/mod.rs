// SPDX-License-Identifier: MIT OR Apache-2.0

//! Departments and teams staff members belong to.
#[cfg(feature = "memory")]
mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;
mod traits;

#[cfg(feature = "memory")]
pub use memory::UnitMemoryStore;
pub use traits::UnitStore;
