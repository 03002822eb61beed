// SPDX-License-Identifier: MIT OR Apache-2.0

//! Catalog of software licenses and tools.
#[cfg(feature = "memory")]
mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;
mod traits;

#[cfg(feature = "memory")]
pub use memory::SoftwareMemoryStore;
pub use traits::SoftwareStore;
