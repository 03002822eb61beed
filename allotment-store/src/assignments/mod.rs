// SPDX-License-Identifier: MIT OR Apache-2.0

//! Assignment edges between staff members and software.
#[cfg(feature = "memory")]
mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;
#[cfg(test)]
mod tests;
mod traits;

#[cfg(feature = "memory")]
pub use memory::AssignmentMemoryStore;
pub use traits::AssignmentStore;
