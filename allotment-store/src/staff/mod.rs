// SPDX-License-Identifier: MIT OR Apache-2.0

//! Staff members and their unit memberships.
#[cfg(feature = "memory")]
mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;
mod traits;

#[cfg(feature = "memory")]
pub use memory::StaffMemoryStore;
pub use traits::StaffStore;
