// SPDX-License-Identifier: MIT OR Apache-2.0

//! Match rules assigning software to every staff member of an organization, department or team.
#[cfg(feature = "memory")]
mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;
mod traits;

#[cfg(feature = "memory")]
pub use memory::MatchMemoryStore;
pub use traits::MatchStore;
